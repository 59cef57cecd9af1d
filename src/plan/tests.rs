//! Tests for plan shaping

use chrono::NaiveDate;
use proptest::prelude::*;

use super::*;
use crate::core::types::{MediaFile, Myelin, Photo, Place, PlaceName, Plan};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn likes(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("liker-{}", i)).collect()
}

fn myelin_plan(id: &str, plan_type: &str, date: &str, like_count: usize, amount: f64) -> Plan {
    Plan::new(id, plan_type, "u1", date).with_myelin(Myelin {
        place_name: PlaceName {
            title: format!("Spot {}", id),
            address: "Main St".to_string(),
        },
        file: Some(MediaFile::new(format!("https://cdn/{}.jpg", id))),
        likes: likes(like_count),
        amount_paid: amount,
        ..Default::default()
    })
}

fn place_plan(id: &str, plan_type: &str, date: &str, photos: &[&str]) -> Plan {
    Plan::new(id, plan_type, "u1", date).with_place(Place {
        place_name: PlaceName {
            title: format!("Place {}", id),
            address: "Harbor Rd".to_string(),
        },
        photos: photos.iter().map(|u| Photo { url: u.to_string() }).collect(),
        ..Default::default()
    })
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn test_expiry_days_sign() {
    let today = day(2024, 5, 30);
    assert_eq!(expiry_days(day(2024, 6, 1), today), 2);
    assert_eq!(expiry_days(today, today), 0);
    assert_eq!(expiry_days(day(2024, 5, 29), today), -1);
}

#[test]
fn test_today_is_not_upcoming() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let plans = vec![
        myelin_plan("today", "Quick", "2024-05-30T18:00:00.000Z", 1, 0.0),
        myelin_plan("past", "Quick", "2024-05-01T00:00:00.000Z", 1, 0.0),
        myelin_plan("soon", "Quick", "2024-05-31T00:00:00.000Z", 1, 0.0),
    ];

    let upcoming = aggregator.upcoming(&plans);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, "soon");
    assert_eq!(upcoming[0].expiry_days, 1);

    // The day view keeps everything
    assert_eq!(aggregator.group_by_day(&plans).len(), 3);
}

// ============================================================================
// Aggregation
// ============================================================================

#[test]
fn test_end_to_end_aggregation() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let mut second = myelin_plan("2", "Quick", "2024-06-01T00:00:00.000Z", 3, 5.0);
    second.place = Some(Place {
        photos: vec![Photo {
            url: "https://cdn/2-place.jpg".to_string(),
        }],
        ..Default::default()
    });

    let plans = vec![
        myelin_plan("1", "Quick", "2024-06-01T00:00:00.000Z", 2, 10.0),
        second,
        myelin_plan("3", "Weekend", "2024-06-05T00:00:00.000Z", 0, 0.0),
    ];

    let upcoming = aggregator.upcoming(&plans);
    assert_eq!(upcoming.len(), 2);

    let quick = &upcoming[0];
    assert_eq!(quick.key, "Quick_2024-06-01");
    assert_eq!(quick.id, "1");
    assert_eq!(quick.plan_ids, vec!["1", "2"]);
    assert_eq!(quick.title, "Quick");
    assert_eq!(quick.likes, 5);
    assert_eq!(quick.amount_paid, 15.0);
    assert_eq!(quick.expiry_days, 2);
    assert_eq!(
        quick.media,
        vec![
            "https://cdn/1.jpg".to_string(),
            "https://cdn/2-place.jpg".to_string(),
            "https://cdn/2.jpg".to_string(),
        ]
    );

    let weekend = &upcoming[1];
    assert_eq!(weekend.key, "Weekend_2024-06-05");
    assert_eq!(weekend.expiry_days, 6);
    assert_eq!(weekend.likes, 0);
}

#[test]
fn test_same_day_different_times_merge() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let plans = vec![
        myelin_plan("a", "Quick", "2024-06-01T08:00:00.000Z", 1, 0.0),
        myelin_plan("b", "Quick", "2024-06-01T20:00:00.000Z", 1, 0.0),
    ];
    let groups = aggregator.group_by_day(&plans);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].likes, 2);
}

#[test]
fn test_unrenderable_and_undated_plans_are_skipped() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let plans = vec![
        Plan::new("empty", "Quick", "u1", "2024-06-01"),
        myelin_plan("bad-date", "Quick", "someday", 1, 0.0),
        myelin_plan("ok", "Quick", "2024-06-01", 1, 0.0),
    ];
    let groups = aggregator.group_by_day(&plans);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, "ok");
    assert!(aggregator.by_month(&plans)[0].plans.len() == 1);
}

#[test]
fn test_upcoming_summary() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));

    let few: Vec<Plan> = (1..=3)
        .map(|i| myelin_plan(&i.to_string(), "Quick", &format!("2024-06-0{}", i + 2), 0, 0.0))
        .collect();
    let summary = aggregator.upcoming_summary(&few);
    assert_eq!(summary.nearest_expiry, Some(4));
    assert!(!summary.show_see_all);

    let many: Vec<Plan> = (1..=6)
        .map(|i| myelin_plan(&i.to_string(), "Quick", &format!("2024-06-0{}", i), 0, 0.0))
        .collect();
    let summary = aggregator.upcoming_summary(&many);
    assert_eq!(summary.plans.len(), 6);
    assert_eq!(summary.nearest_expiry, Some(2));
    assert!(summary.show_see_all);

    let none = aggregator.upcoming_summary(&[]);
    assert_eq!(none.nearest_expiry, None);
    assert!(none.plans.is_empty());
}

// ============================================================================
// Calendar and quick plans
// ============================================================================

#[test]
fn test_by_month_first_seen_order() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let plans = vec![
        place_plan("1", "Weekend", "2024-07-04", &["https://cdn/p1.jpg"]),
        myelin_plan("2", "Quick", "2024-06-01", 1, 0.0),
        place_plan("3", "Weekend", "2024-07-04", &["https://cdn/p3a.jpg", "https://cdn/p3b.jpg"]),
        myelin_plan("4", "Quick", "2024-05-02", 1, 0.0),
        myelin_plan("5", "Quick", "2024-06-01", 2, 0.0),
    ];

    let months = aggregator.by_month(&plans);
    let labels: Vec<&str> = months.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(labels, vec!["July 2024", "June 2024", "May 2024"]);

    let july = &months[0];
    assert_eq!(july.plans.len(), 1);
    assert_eq!(
        july.plans[0].media,
        vec!["https://cdn/p1.jpg", "https://cdn/p3a.jpg", "https://cdn/p3b.jpg"]
    );
    assert_eq!(july.plans[0].place.as_ref().unwrap().place_name.title, "Place 1");

    let june = &months[1];
    assert_eq!(june.plans.len(), 1);
    assert_eq!(june.plans[0].likes, 3);

    // Past plans stay in the calendar
    assert_eq!(months[2].plans[0].expiry_days, -28);
}

#[test]
fn test_same_month_different_years_are_separate() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let plans = vec![
        myelin_plan("1", "Quick", "2024-06-01", 0, 0.0),
        myelin_plan("2", "Quick", "2025-06-01", 0, 0.0),
    ];
    let months = aggregator.by_month(&plans);
    assert_eq!(months.len(), 2);
    assert_eq!(months[1].label, "June 2025");
}

#[test]
fn test_quick_plan_projection() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let plans = vec![
        myelin_plan("1", "Quick", "2024-06-01T09:00:00.000Z", 1, 2.0),
        myelin_plan("2", "Quick", "2024-06-01T10:00:00.000Z", 2, 3.0),
        myelin_plan("3", "Weekend", "2024-06-01", 7, 0.0),
        myelin_plan("4", "Quick", "2024-06-04", 0, 0.0),
        myelin_plan("5", "Quick", "2024-05-01", 0, 0.0),
    ];

    assert_eq!(aggregator.upcoming_expiry_days(&plans), vec![2, 5]);

    let in_two = aggregator.quick_plans_expiring_in(&plans, 2);
    assert_eq!(in_two.len(), 1);
    assert_eq!(in_two[0].likes, 3);
    assert_eq!(in_two[0].amount_paid, 5.0);

    assert_eq!(aggregator.quick_plans_expiring_in(&plans, 5).len(), 1);
    assert!(aggregator.quick_plans_expiring_in(&plans, 3).is_empty());
}

// ============================================================================
// Plan events and details
// ============================================================================

#[test]
fn test_plan_events_media() {
    let aggregator = PlanAggregator::new(day(2024, 5, 30));
    let mut mixed = place_plan("2", "Quick", "2024-06-01T15:00:00.000Z", &["https://cdn/photo.jpg"]);
    mixed.myelin = Some(Myelin {
        place_name: PlaceName {
            title: "Clip".to_string(),
            address: String::new(),
        },
        file: Some(MediaFile {
            url: "https://cdn/clip.mp4".to_string(),
            thumbnail_url: Some("https://cdn/clip.jpg".to_string()),
        }),
        likes: likes(4),
        amount_paid: 8.0,
        ..Default::default()
    });

    let plans = vec![
        myelin_plan("1", "Quick", "2024-06-01T00:00:00.000Z", 1, 1.0),
        mixed,
        myelin_plan("3", "Quick", "2024-06-02T00:00:00.000Z", 0, 0.0),
        myelin_plan("4", "Weekend", "2024-06-01T00:00:00.000Z", 0, 0.0),
    ];

    let items = aggregator.plan_events(&plans, "1");
    let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
    assert_eq!(
        urls,
        vec!["https://cdn/1.jpg", "https://cdn/photo.jpg", "https://cdn/clip.jpg"]
    );
    assert_eq!(items[1].title, "Place 2");
    assert_eq!(items[1].likes, 4);
    assert_eq!(items[2].title, "Clip");
    assert_eq!(items[2].plan_id, "2");

    assert!(aggregator.plan_events(&plans, "missing").is_empty());
}

#[test]
fn test_event_details_prefers_place() {
    let mut plan = place_plan("1", "Quick", "2024-06-01", &["https://cdn/a.jpg"]);
    if let Some(place) = plan.place.as_mut() {
        place.sub_tags = vec!["music".to_string()];
        place.description = "Open air".to_string();
    }
    plan.myelin = Some(Myelin {
        place_name: PlaceName {
            title: "Ignored".to_string(),
            address: String::new(),
        },
        sub_tags: vec!["dance".to_string(), "food".to_string()],
        file: Some(MediaFile::new("https://cdn/m.jpg")),
        ..Default::default()
    });

    let details = plan.event_details().unwrap();
    assert_eq!(details.title, "Place 1");
    assert_eq!(details.description, "Open air");
    assert_eq!(details.sub_tags, vec!["music", "dance", "food"]);
    assert_eq!(details.photos, vec!["https://cdn/a.jpg", "https://cdn/m.jpg"]);
    assert_eq!(details.event_count, 3);
}

#[test]
fn test_event_details_myelin_fallback_and_missing_title() {
    let plan = myelin_plan("m", "Quick", "2024-06-01", 0, 0.0);
    let details = plan.event_details().unwrap();
    assert_eq!(details.title, "Spot m");
    assert_eq!(details.event_count, 1);

    let untitled = Plan::new("x", "Quick", "u1", "2024-06-01").with_myelin(Myelin::default());
    assert!(untitled.event_details().is_none());
    assert!(Plan::new("y", "Quick", "u1", "2024-06-01").event_details().is_none());
}

#[test]
fn test_saved_events_summary() {
    let mut tagged = place_plan("1", "Quick", "2024-06-01", &["https://cdn/a.jpg"]);
    if let Some(place) = tagged.place.as_mut() {
        place.sub_tags = vec!["a".to_string(), "b".to_string()];
    }
    let plans = vec![
        tagged,
        myelin_plan("2", "Quick", "2024-06-02", 0, 0.0),
        Plan::new("3", "Quick", "u1", "2024-06-03"),
    ];

    let summary = saved_events(&plans);
    assert_eq!(summary.total_events, 3);
    assert_eq!(summary.photos, vec!["https://cdn/a.jpg", "https://cdn/2.jpg"]);
}

#[test]
fn test_distinct_events() {
    let plans = vec![
        myelin_plan("1", "Quick", "2024-06-01", 0, 0.0),
        myelin_plan("1", "Weekend", "2024-06-02", 0, 0.0),
        place_plan("2", "Quick", "2024-06-01", &[]),
    ];
    assert_eq!(
        distinct_events(&plans),
        vec!["Spot 1-Main St".to_string(), "Place 2-Harbor Rd".to_string()]
    );
}

// ============================================================================
// Property tests
// ============================================================================

fn arb_plan() -> impl Strategy<Value = Plan> {
    (
        0u32..1000,
        prop::sample::select(vec!["Quick", "Weekend", "quick"]),
        prop::sample::select(vec![
            "2024-06-01T00:00:00.000Z",
            "2024-06-01T12:00:00.000Z",
            "2024-06-05T00:00:00.000Z",
            "2024-07-10",
        ]),
        0usize..5,
        0u32..100,
    )
        .prop_map(|(id, plan_type, date, like_count, amount)| {
            myelin_plan(&id.to_string(), plan_type, date, like_count, amount as f64)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Deduplicating twice changes nothing
    #[test]
    fn prop_dedup_idempotent(plans in prop::collection::vec(arb_plan(), 0..30)) {
        let once = dedup_plans(plans);
        let twice = dedup_plans(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Output keys are unique and output is an ordered subsequence of input
    #[test]
    fn prop_dedup_unique_and_ordered(plans in prop::collection::vec(arb_plan(), 0..30)) {
        let unique = dedup_plans(plans.clone());

        let mut keys = std::collections::HashSet::new();
        for plan in &unique {
            prop_assert!(keys.insert((plan.plan_type.clone(), plan.date.clone())));
        }

        let mut cursor = plans.iter();
        for kept in &unique {
            prop_assert!(cursor.any(|p| p == kept));
        }

        // Every input key is represented
        for plan in &plans {
            prop_assert!(keys.contains(&(plan.plan_type.clone(), plan.date.clone())));
        }
    }

    /// Merging never loses likes or media
    #[test]
    fn prop_aggregation_preserves_totals(plans in prop::collection::vec(arb_plan(), 0..30)) {
        let aggregator = PlanAggregator::new(day(2024, 5, 30));
        let groups = aggregator.group_by_day(&plans);

        let likes: u64 = plans.iter().map(Plan::like_count).sum();
        let media: usize = plans.iter().map(|p| p.media_urls().len()).sum();
        let merged: usize = groups.iter().map(|g| g.plan_ids.len()).sum();

        prop_assert_eq!(groups.iter().map(|g| g.likes).sum::<u64>(), likes);
        prop_assert_eq!(groups.iter().map(|g| g.media.len()).sum::<usize>(), media);
        prop_assert_eq!(merged, plans.len());

        let upcoming = aggregator.upcoming(&plans);
        prop_assert!(upcoming.windows(2).all(|w| w[0].expiry_days <= w[1].expiry_days));
        prop_assert!(upcoming.iter().all(|g| g.expiry_days > 0));
    }
}
