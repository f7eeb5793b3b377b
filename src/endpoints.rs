//! Built-in report endpoint definitions
//!
//! Each supported report controller is registered once with its family, the
//! SDK filters applied to its queries and its recommended field list. Short
//! aliases such as `installs` resolve to the full controller path.

use crate::export::EndpointFamily;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Static description of one report endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDefinition {
    /// Controller path, e.g. `advertiser/stats/installs`
    pub controller: &'static str,
    /// Short name accepted by [`get`]
    pub alias: &'static str,
    pub family: EndpointFamily,
    /// Append `(debug_mode=0 OR debug_mode is NULL)` to filters
    pub filter_debug_mode: bool,
    /// Append `(test_profile_id=0 OR test_profile_id IS NULL)` to filters
    pub filter_test_profile_id: bool,
    pub recommended_fields: &'static [&'static str],
    pub description: &'static str,
}

impl EndpointDefinition {
    /// Definition for a controller outside the registry
    pub const fn custom(controller: &'static str, family: EndpointFamily) -> Self {
        Self {
            controller,
            alias: controller,
            family,
            filter_debug_mode: false,
            filter_test_profile_id: false,
            recommended_fields: &[],
            description: "",
        }
    }
}

const ACTUALS: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats",
    alias: "actuals",
    family: EndpointFamily::Actuals,
    filter_debug_mode: true,
    filter_test_profile_id: true,
    recommended_fields: &[
        "site_id",
        "site.name",
        "publisher_id",
        "publisher.name",
        "ad_impressions",
        "ad_impressions_unique",
        "ad_clicks",
        "ad_clicks_unique",
        "paid_installs",
        "paid_installs_assists",
        "non_installs_assists",
        "paid_events",
        "paid_events_assists",
        "non_events_assists",
        "paid_opens",
        "paid_opens_assists",
        "non_opens_assists",
    ],
    description: "Aggregated advertiser stats",
};

const INSTALLS: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats/installs",
    alias: "installs",
    family: EndpointFamily::Logs,
    filter_debug_mode: true,
    filter_test_profile_id: true,
    recommended_fields: &[
        "id",
        "created",
        "status",
        "site_id",
        "site.name",
        "publisher_id",
        "publisher.name",
        "advertiser_ref_id",
        "advertiser_sub_campaign_id",
        "advertiser_sub_campaign.ref",
        "publisher_sub_campaign_id",
        "publisher_sub_campaign.ref",
        "user_id",
        "device_id",
        "os_id",
        "google_aid",
        "ios_ifa",
        "ios_ifv",
        "windows_aid",
        "referral_url",
        "is_view_through",
    ],
    description: "Install logs",
};

const EVENTS: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats/events",
    alias: "events",
    family: EndpointFamily::Logs,
    filter_debug_mode: true,
    filter_test_profile_id: true,
    recommended_fields: &[
        "id",
        "stat_install_id",
        "created",
        "status",
        "site_id",
        "site.name",
        "site_event_id",
        "site_event.name",
        "site_event.type",
        "publisher_id",
        "publisher.name",
        "advertiser_ref_id",
        "advertiser_sub_campaign_id",
        "advertiser_sub_campaign.ref",
        "publisher_sub_campaign_id",
        "publisher_sub_campaign.ref",
        "user_id",
        "device_id",
        "os_id",
        "google_aid",
        "ios_ifa",
        "ios_ifv",
        "windows_aid",
        "referral_url",
        "is_view_through",
        "is_reengagement",
    ],
    description: "Event logs",
};

const POSTBACKS: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats/postbacks",
    alias: "postbacks",
    family: EndpointFamily::Logs,
    filter_debug_mode: false,
    filter_test_profile_id: true,
    recommended_fields: &[
        "id",
        "stat_install_id",
        "stat_event_id",
        "stat_open_id",
        "created",
        "status",
        "site_id",
        "site.name",
        "site_event_id",
        "site_event.name",
        "site_event.type",
        "publisher_id",
        "publisher.name",
        "attributed_publisher_id",
        "attributed_publisher.name",
        "url",
        "http_result",
    ],
    description: "Postback logs",
};

const EVENT_ITEMS: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats/event/items",
    alias: "event_items",
    family: EndpointFamily::Logs,
    filter_debug_mode: false,
    filter_test_profile_id: true,
    recommended_fields: &[
        "id",
        "created",
        "site_id",
        "site.name",
        "campaign_id",
        "campaign.name",
        "site_event_id",
        "site_event.name",
        "site_event_item_id",
        "site_event_item.name",
        "quantity",
        "value_usd",
        "country_id",
        "country.name",
        "region_id",
        "region.name",
        "agency_id",
        "agency.name",
        "advertiser_sub_site_id",
        "advertiser_sub_site.name",
        "advertiser_sub_campaign_id",
        "advertiser_sub_campaign.name",
        "currency_code",
        "value",
    ],
    description: "Event item logs",
};

const RETENTION: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats/retention",
    alias: "retention",
    family: EndpointFamily::Insights,
    filter_debug_mode: false,
    filter_test_profile_id: true,
    recommended_fields: &[
        "site_id",
        "site.name",
        "install_publisher_id",
        "install_publisher.name",
        "installs",
        "opens",
    ],
    description: "Cohort retention",
};

const LTV: EndpointDefinition = EndpointDefinition {
    controller: "advertiser/stats/ltv",
    alias: "ltv",
    family: EndpointFamily::Insights,
    filter_debug_mode: false,
    filter_test_profile_id: true,
    recommended_fields: &[
        "site_id",
        "site.name",
        "publisher_id",
        "publisher.name",
        "rpi",
        "epi",
    ],
    description: "Cohort lifetime value",
};

/// Every built-in endpoint, in listing order
pub static ENDPOINTS: &[EndpointDefinition] =
    &[ACTUALS, INSTALLS, EVENTS, EVENT_ITEMS, POSTBACKS, RETENTION, LTV];

/// Controller paths and aliases → definition
pub static REGISTRY: LazyLock<HashMap<&'static str, &'static EndpointDefinition>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        for definition in ENDPOINTS {
            m.insert(definition.controller, definition);
            m.insert(definition.alias, definition);
        }
        m
    });

/// Look up an endpoint by controller path or alias
pub fn get(name: &str) -> Option<&'static EndpointDefinition> {
    REGISTRY.get(name.trim().trim_matches('/')).copied()
}

/// Check if a name resolves to a built-in endpoint
pub fn is_builtin(name: &str) -> bool {
    get(name).is_some()
}

/// Built-in endpoints of one family
pub fn by_family(family: EndpointFamily) -> Vec<&'static EndpointDefinition> {
    ENDPOINTS.iter().filter(|d| d.family == family).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_controller_and_alias() {
        let by_path = get("advertiser/stats/installs").unwrap();
        let by_alias = get("installs").unwrap();
        assert_eq!(by_path, by_alias);
        assert_eq!(by_alias.family, EndpointFamily::Logs);
        assert_eq!(get("/advertiser/stats/ltv/").unwrap().alias, "ltv");
    }

    #[test]
    fn test_unknown_endpoint() {
        assert!(get("advertiser/stats/unknown").is_none());
        assert!(!is_builtin("clicks_v3"));
    }

    #[test]
    fn test_installs_recommended_fields() {
        let installs = get("installs").unwrap();
        assert_eq!(installs.recommended_fields.len(), 21);
        assert_eq!(installs.recommended_fields[0], "id");
        assert!(installs.recommended_fields.contains(&"advertiser_sub_campaign.ref"));
    }

    #[test]
    fn test_families() {
        let insights: Vec<&str> = by_family(EndpointFamily::Insights)
            .iter()
            .map(|d| d.alias)
            .collect();
        assert_eq!(insights, vec!["retention", "ltv"]);
        assert_eq!(get("actuals").unwrap().family, EndpointFamily::Actuals);
    }

    #[test]
    fn test_event_items_endpoint() {
        let items = get("event_items").unwrap();
        assert_eq!(items, get("advertiser/stats/event/items").unwrap());
        assert_eq!(items.family, EndpointFamily::Logs);
        assert!(!items.filter_debug_mode);
        assert!(items.filter_test_profile_id);
        assert_eq!(items.recommended_fields.len(), 24);
    }

    #[test]
    fn test_every_definition_is_registered() {
        assert_eq!(REGISTRY.len(), ENDPOINTS.len() * 2);
    }
}
