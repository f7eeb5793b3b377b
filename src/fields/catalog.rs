//! Endpoint field catalog
//!
//! Built from the `apidoc/get_controllers` metadata. Related entities are
//! expanded into dotted names: a `site_id` column with declared related
//! fragments `name` and `ref` yields `site.name` and `site.ref`. When no
//! fragments are declared, `site.name` is assumed.

use super::types::{ApiField, ApiModel, FieldDescriptor, FieldMap, FieldSelection};
use crate::error::{Error, Result};
use crate::service::{ReportRequest, ReportRequestClient};
use std::collections::BTreeMap;
use tracing::debug;

/// Suffixes kept for related fields under [`FieldSelection::MINIMAL`]
const MINIMAL_RELATED_SUFFIXES: &[&str] = &[".name", ".ref"];

/// Resolved fields of one endpoint
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    controller: String,
    model_name: Option<String>,
    fields: FieldMap,
}

impl FieldCatalog {
    /// Build a catalog from raw API metadata
    pub fn from_model(controller: impl Into<String>, model: ApiModel) -> Self {
        Self {
            controller: controller.into(),
            model_name: model.model_name,
            fields: build_field_map(&model.fields),
        }
    }

    /// Request metadata for `controller` and build its catalog
    pub async fn fetch(
        client: &ReportRequestClient,
        api_key: &str,
        controller: &str,
    ) -> Result<Self> {
        let request = ReportRequest::new("apidoc", "get_controllers", api_key)
            .param("controllers", controller)
            .param("details", "modelName,fields");

        let response = client.send(&request).await?;
        if response.http_code() != 200 {
            return Err(Error::service(
                response.http_code(),
                response.request_url(),
            ));
        }

        let first = response
            .data()
            .and_then(|data| data.as_array())
            .and_then(|models| models.first())
            .cloned()
            .ok_or_else(|| Error::Catalog {
                controller: controller.to_string(),
            })?;

        let model: ApiModel = serde_json::from_value(first)?;
        if model.fields.is_empty() {
            return Err(Error::Catalog {
                controller: controller.to_string(),
            });
        }
        let catalog = Self::from_model(controller, model);
        debug!(
            "Resolved {} fields for '{}'",
            catalog.fields.len(),
            controller
        );
        Ok(catalog)
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// All descriptors keyed by name
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sorted field names matching `selection`
    ///
    /// [`FieldSelection::RECOMMENDED`] is not handled here: the recommended
    /// list belongs to the endpoint, not to the server metadata.
    pub fn select(&self, selection: FieldSelection) -> Vec<String> {
        let default = selection.contains(FieldSelection::DEFAULT);
        let related = selection.contains(FieldSelection::RELATED);
        let minimal = selection.contains(FieldSelection::MINIMAL);

        if related && !default {
            return self.fields.keys().cloned().collect();
        }

        self.fields
            .values()
            .filter(|field| {
                if field.related && !related && !minimal {
                    return false;
                }
                if !default {
                    return !field.related || related;
                }
                if field.default {
                    if minimal && field.related {
                        return MINIMAL_RELATED_SUFFIXES
                            .iter()
                            .any(|suffix| field.name.ends_with(suffix));
                    }
                    return true;
                }
                related && field.related
            })
            .map(|field| field.name.clone())
            .collect()
    }
}

/// Expand raw metadata into direct and synthesised related fields
fn build_field_map(api_fields: &[ApiField]) -> FieldMap {
    let mut direct = FieldMap::new();
    let mut related: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for field in api_fields {
        if field.related {
            if field.field_type.as_deref() == Some("property") {
                related.entry(field.name.clone()).or_default();
                continue;
            }
            if let Some((property, fragment)) = field.name.split_once('.') {
                related
                    .entry(property.to_string())
                    .or_default()
                    .push(fragment.to_string());
            }
            continue;
        }

        direct.insert(
            field.name.clone(),
            FieldDescriptor::new(&field.name, field.field_default, false),
        );
    }

    let mut merged = direct.clone();
    for (name, descriptor) in &direct {
        let Some(property) = name.strip_suffix("_id") else {
            continue;
        };
        if property.is_empty() {
            continue;
        }

        let fragments = related
            .get(property)
            .filter(|fragments| !fragments.is_empty());

        let synthesised: Vec<String> = match fragments {
            Some(fragments) => fragments
                .iter()
                .filter(|fragment| fragment.as_str() != "id")
                .map(|fragment| format!("{property}.{fragment}"))
                .collect(),
            None => vec![format!("{property}.name")],
        };

        for related_name in synthesised {
            merged.insert(
                related_name.clone(),
                FieldDescriptor::new(related_name, descriptor.default, true),
            );
        }
    }

    merged
}
