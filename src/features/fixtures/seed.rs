use chrono::{Duration, Utc};
use sqlx::types::Json;
use uuid::Uuid;

use crate::features::disasters::models::{AuditAction, AuditEntry, Disaster};
use crate::features::reports::models::{Report, VerificationStatus};
use crate::features::resources::models::{Resource, ResourceType};

pub(super) struct SeedData {
    pub disasters: Vec<Disaster>,
    pub reports: Vec<Report>,
    pub resources: Vec<Resource>,
}

/// (title, location, lat, lng, description, tags, owner, hours ago)
const DISASTERS: &[(&str, &str, f64, f64, &str, &[&str], &str, i64)] = &[
    (
        "NYC Flood",
        "Manhattan, NYC",
        40.7831,
        -73.9712,
        "Heavy flooding in Manhattan after record rainfall. Subway lines suspended and basements flooded.",
        &["flood", "urgent"],
        "netrunnerX",
        6,
    ),
    (
        "Brooklyn Power Outage",
        "Brooklyn, NYC",
        40.6782,
        -73.9442,
        "Storm damage left large parts of Brooklyn without power. Hospitals on backup generators.",
        &["power", "storm"],
        "reliefAdmin",
        20,
    ),
    (
        "Camp Fire Evacuation",
        "Paradise, California",
        39.7596,
        -121.6219,
        "Fast-moving wildfire near Paradise. Mandatory evacuation for Butte County residents.",
        &["wildfire", "evacuation"],
        "reliefAdmin",
        48,
    ),
];

/// (disaster index, user, content, image, status, hours ago)
const REPORTS: &[(usize, &str, &str, Option<&str>, VerificationStatus, i64)] = &[
    (
        0,
        "citizen1",
        "Water knee-deep on 5th Ave, cars stalled. Need food and water at the corner shelter.",
        Some("https://images.example.org/flood-5th-ave.jpg"),
        VerificationStatus::Pending,
        2,
    ),
    (
        0,
        "citizen2",
        "Family trapped on second floor near Main St, water still rising.",
        None,
        VerificationStatus::Verified,
        3,
    ),
    (
        1,
        "citizen3",
        "Traffic lights out along Flatbush Ave, drive carefully.",
        None,
        VerificationStatus::Pending,
        10,
    ),
    (
        2,
        "citizen4",
        "Smoke visible from Chico, roads out of Paradise congested.",
        Some("https://images.example.org/paradise-smoke.jpg"),
        VerificationStatus::Rejected,
        30,
    ),
];

/// (disaster index, name, location, lat, lng, type, capacity, hours ago)
const RESOURCES: &[(usize, &str, &str, f64, f64, ResourceType, Option<i32>, i64)] = &[
    (
        0,
        "Red Cross Shelter",
        "Lower East Side, NYC",
        40.7150,
        -73.9843,
        ResourceType::Shelter,
        Some(200),
        5,
    ),
    (
        0,
        "Bellevue Hospital",
        "First Ave, Manhattan, NYC",
        40.7394,
        -73.9754,
        ResourceType::Hospital,
        None,
        5,
    ),
    (
        0,
        "Community Food Bank",
        "Harlem, NYC",
        40.8116,
        -73.9465,
        ResourceType::Food,
        Some(500),
        4,
    ),
    (
        1,
        "Water Distribution Point",
        "Prospect Park, Brooklyn, NYC",
        40.6602,
        -73.9690,
        ResourceType::Water,
        Some(1000),
        18,
    ),
    (
        2,
        "Chico Evacuation Center",
        "Chico, California",
        39.7285,
        -121.8375,
        ResourceType::Shelter,
        Some(800),
        40,
    ),
];

pub(super) fn build() -> SeedData {
    let now = Utc::now();

    let disasters: Vec<Disaster> = DISASTERS
        .iter()
        .map(
            |(title, location, lat, lng, description, tags, owner, hours_ago)| {
                let created_at = now - Duration::hours(*hours_ago);
                Disaster {
                    id: Uuid::new_v4(),
                    title: title.to_string(),
                    location_name: location.to_string(),
                    lat: Some(*lat),
                    lng: Some(*lng),
                    description: description.to_string(),
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    owner_id: owner.to_string(),
                    audit_trail: Json(vec![AuditEntry {
                        action: AuditAction::Create,
                        user_id: owner.to_string(),
                        timestamp: created_at,
                        details: None,
                    }]),
                    created_at,
                    updated_at: created_at,
                }
            },
        )
        .collect();

    let reports = REPORTS
        .iter()
        .map(|(idx, user, content, image, status, hours_ago)| Report {
            id: Uuid::new_v4(),
            disaster_id: disasters[*idx].id,
            user_id: user.to_string(),
            content: content.to_string(),
            image_url: image.map(str::to_string),
            verification_status: *status,
            verification: None,
            created_at: now - Duration::hours(*hours_ago),
        })
        .collect();

    let resources = RESOURCES
        .iter()
        .map(
            |(idx, name, location, lat, lng, resource_type, capacity, hours_ago)| Resource {
                id: Uuid::new_v4(),
                disaster_id: disasters[*idx].id,
                name: name.to_string(),
                location_name: location.to_string(),
                lat: Some(*lat),
                lng: Some(*lng),
                resource_type: *resource_type,
                capacity: *capacity,
                available: true,
                created_at: now - Duration::hours(*hours_ago),
            },
        )
        .collect();

    SeedData {
        disasters,
        reports,
        resources,
    }
}
