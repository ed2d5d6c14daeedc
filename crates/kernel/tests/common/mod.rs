#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Builds a small law-firm site with the fixture builders and wires the real
//! widget, renderer and in-memory store around it.

#![allow(dead_code)]

use std::sync::Arc;

use kinship_kernel::host::SiteIndex;
use kinship_kernel::theme::RelatedRenderer;
use kinship_kernel::{Collaborators, Config, CurrentItem, RelatedContent};
use kinship_test_utils::{TestSite, test_item, test_site, test_taxonomy};
use uuid::Uuid;

/// Fixed item ids of the fixture site.
pub mod ids {
    use uuid::Uuid;

    const fn id(n: u128) -> Uuid {
        Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0000 | n)
    }

    pub const CAR_ACCIDENT_GUIDE: Uuid = id(1);
    pub const REAR_END: Uuid = id(2);
    pub const TRUCK_CRASHES: Uuid = id(3);
    pub const MALPRACTICE_BASICS: Uuid = id(4);
    pub const DRAFT_POST: Uuid = id(5);
    pub const UNTAGGED_POST: Uuid = id(6);
    pub const ABOUT: Uuid = id(10);
    pub const ATTORNEYS: Uuid = id(11);
    pub const CONTACT: Uuid = id(12);
    pub const PREMISES: Uuid = id(20);
    pub const DOG_BITES: Uuid = id(21);
}

/// 2024-01-01T00:00:00Z plus `days`.
pub fn day(days: i64) -> i64 {
    1_704_067_200 + days * 86_400
}

/// The fixture site as a builder.
pub fn law_firm_site() -> TestSite {
    test_site()
        .with_content_type("practice_area")
        .with_taxonomy(
            test_taxonomy("category", &["post", "practice_area"])
                .with_term("personal-injury")
                .with_term("car-accidents")
                .with_term("truck-accidents")
                .with_term("medical-malpractice")
                .with_term("premises-liability")
                .with_term("animal-attacks"),
        )
        .with_taxonomy(
            test_taxonomy("locations", &["post", "practice_area"])
                .hierarchical()
                .with_term("california")
                .with_child("los-angeles", "california")
                .with_child("beverly-hills", "los-angeles")
                .with_child("san-diego", "california"),
        )
        .with_taxonomy(test_taxonomy("post_tag", &["post"]).with_term("guides"))
        .with_item(
            test_item("post", "Car Accident Guide")
                .with_id(ids::CAR_ACCIDENT_GUIDE)
                .created_at(day(100))
                .with_terms("category", &["car-accidents", "personal-injury"])
                .with_primary_term("category", "car-accidents")
                .with_terms("locations", &["los-angeles"]),
        )
        .with_item(
            test_item("post", "Rear-End Collisions")
                .with_id(ids::REAR_END)
                .with_permalink("/blog/rear-end-collisions")
                .created_at(day(60))
                .with_terms("category", &["car-accidents"])
                .with_terms("locations", &["beverly-hills"]),
        )
        .with_item(
            test_item("post", "Truck Crashes")
                .with_id(ids::TRUCK_CRASHES)
                .created_at(day(30))
                .with_terms("category", &["car-accidents", "truck-accidents"])
                .with_terms("locations", &["san-diego"]),
        )
        .with_item(
            test_item("post", "Medical Malpractice Basics")
                .with_id(ids::MALPRACTICE_BASICS)
                .created_at(day(10))
                .with_terms("category", &["medical-malpractice", "personal-injury"]),
        )
        .with_item(
            test_item("post", "Unfinished Draft")
                .with_id(ids::DRAFT_POST)
                .unpublished()
                .created_at(day(120))
                .with_terms("category", &["car-accidents"]),
        )
        .with_item(
            test_item("post", "Office News")
                .with_id(ids::UNTAGGED_POST)
                .created_at(day(5)),
        )
        .with_item(
            test_item("page", "Contact")
                .with_id(ids::CONTACT)
                .with_menu_order(1),
        )
        .with_item(
            test_item("page", "About Us")
                .with_id(ids::ABOUT)
                .with_slug("about-us")
                .with_menu_order(3),
        )
        .with_item(
            test_item("page", "attorneys")
                .with_id(ids::ATTORNEYS)
                .with_menu_order(2),
        )
        .with_item(
            test_item("practice_area", "Premises Liability")
                .with_id(ids::PREMISES)
                .created_at(day(50))
                .with_permalink("/practice-areas/premises-liability")
                .with_text_field(
                    "practice_area_page_title",
                    "Slip & Fall Injuries",
                    "plain_text",
                )
                .with_field(
                    "practice_area_page_icon",
                    serde_json::json!("/icons/premises.svg"),
                )
                .with_field(
                    "practice_area_page_image",
                    serde_json::json!("/images/premises.jpg"),
                )
                .with_terms("category", &["premises-liability"])
                .with_terms("locations", &["los-angeles"]),
        )
        .with_item(
            test_item("practice_area", "Dog Bites")
                .with_id(ids::DOG_BITES)
                .created_at(day(40))
                .with_thumbnail("/images/dog-bites.jpg")
                .with_terms("category", &["premises-liability", "animal-attacks"])
                .with_terms("locations", &["san-diego"]),
        )
}

/// The fixture site, indexed.
pub fn site() -> Arc<SiteIndex> {
    Arc::new(SiteIndex::from_value(law_firm_site().to_json()).unwrap())
}

/// Widget over the fixture site with the given configuration.
pub fn widget_with(config: Config) -> RelatedContent {
    let renderer = RelatedRenderer::new(config).unwrap();
    RelatedContent::new(Collaborators::uniform(site()), renderer)
}

/// Widget over the fixture site with the default configuration.
pub fn widget() -> RelatedContent {
    widget_with(Config::default())
}

pub fn current(id: Uuid) -> Option<CurrentItem> {
    Some(CurrentItem(id))
}
