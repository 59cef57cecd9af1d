//! View-model projections over the flat plan list
//!
//! Plans are merged by `planType_YYYY-MM-DD`: media lists are concatenated,
//! likes and amounts summed. Expiry is the signed whole-day distance between
//! the plan's calendar day and today, and is recomputed on every call.

use chrono::{Datelike, NaiveDate, Utc};

use super::details::{event_details, EventDetails};
use crate::core::types::{Myelin, Place, Plan};
use crate::core::utils::format_title;

/// Plan type shown on the quick-plans screen
pub const QUICK_PLAN_TYPE: &str = "Quick";

/// Upcoming lists longer than this offer a "see all" entry
pub const SEE_ALL_THRESHOLD: usize = 5;

/// Whole days from `today` to `day`; zero means today, negative means past
pub fn expiry_days(day: NaiveDate, today: NaiveDate) -> i64 {
    (day - today).num_days()
}

/// Grouping key of a plan type on a calendar day
pub fn group_key(plan_type: &str, day: NaiveDate) -> String {
    format!("{}_{}", plan_type, day.format("%Y-%m-%d"))
}

/// Plans of one type on one calendar day, merged for display
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPlan {
    /// `planType_YYYY-MM-DD`
    pub key: String,
    /// Id of the first plan of the group
    pub id: String,
    /// Ids of every merged plan, in first-seen order
    pub plan_ids: Vec<String>,
    pub plan_type: String,
    /// Display title derived from the plan type
    pub title: String,
    pub day: NaiveDate,
    /// First place seen in the group
    pub place: Option<Place>,
    /// First myelin seen in the group
    pub myelin: Option<Myelin>,
    /// Place photos and myelin display URLs of every merged plan
    pub media: Vec<String>,
    pub likes: u64,
    pub amount_paid: f64,
    pub expiry_days: i64,
}

impl AggregatedPlan {
    fn new(plan: &Plan, day: NaiveDate, today: NaiveDate) -> Self {
        Self {
            key: group_key(&plan.plan_type, day),
            id: plan.id.clone(),
            plan_ids: vec![plan.id.clone()],
            plan_type: plan.plan_type.clone(),
            title: format_title(&plan.plan_type),
            day,
            place: plan.place.clone(),
            myelin: plan.myelin.clone(),
            media: plan.media_urls(),
            likes: plan.like_count(),
            amount_paid: plan.amount_paid(),
            expiry_days: expiry_days(day, today),
        }
    }

    fn merge(&mut self, plan: &Plan) {
        self.plan_ids.push(plan.id.clone());
        if self.place.is_none() {
            self.place = plan.place.clone();
        }
        if self.myelin.is_none() {
            self.myelin = plan.myelin.clone();
        }
        self.media.extend(plan.media_urls());
        self.likes += plan.like_count();
        self.amount_paid += plan.amount_paid();
    }

    /// Card details of the group's representative place/myelin
    pub fn event_details(&self) -> Option<EventDetails> {
        event_details(self.place.as_ref(), self.myelin.as_ref())
    }

    pub fn is_upcoming(&self) -> bool {
        self.expiry_days > 0
    }
}

/// Plans of one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    /// e.g. "June 2024"
    pub label: String,
    pub year: i32,
    pub month: u32,
    pub plans: Vec<AggregatedPlan>,
}

/// Upcoming strip: sorted groups plus the alert and "see all" inputs
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingPlans {
    pub plans: Vec<AggregatedPlan>,
    /// Smallest positive expiry, if anything is upcoming
    pub nearest_expiry: Option<i64>,
    pub show_see_all: bool,
}

/// One media item on the plan-events screen
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub url: String,
    pub title: String,
    pub likes: u64,
    pub amount_paid: f64,
    /// Plan the item belongs to
    pub plan_id: String,
}

/// Derives grouped views relative to a fixed "today"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanAggregator {
    today: NaiveDate,
}

impl Default for PlanAggregator {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl PlanAggregator {
    /// Plan dates are read in UTC, so "today" should be a UTC day as well
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Renderable plans with a parseable date, paired with their day
    fn dated<'a>(&self, plans: &'a [Plan]) -> impl Iterator<Item = (&'a Plan, NaiveDate)> + 'a {
        plans.iter().filter(|p| p.is_renderable()).filter_map(|plan| {
            let day = plan.calendar_day();
            if day.is_none() {
                tracing::debug!(plan_id = %plan.id, date = %plan.date, "Skipping plan with unparseable date");
            }
            day.map(|d| (plan, d))
        })
    }

    fn merge_into(&self, groups: &mut Vec<AggregatedPlan>, plan: &Plan, day: NaiveDate) {
        let key = group_key(&plan.plan_type, day);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.merge(plan),
            None => groups.push(AggregatedPlan::new(plan, day, self.today)),
        }
    }

    /// Every `planType_day` group in first-seen order, past ones included
    pub fn group_by_day(&self, plans: &[Plan]) -> Vec<AggregatedPlan> {
        let mut groups = Vec::new();
        for (plan, day) in self.dated(plans) {
            self.merge_into(&mut groups, plan, day);
        }
        groups
    }

    /// Groups still ahead, soonest first; ties keep first-seen order
    pub fn upcoming(&self, plans: &[Plan]) -> Vec<AggregatedPlan> {
        let mut groups: Vec<AggregatedPlan> = self
            .group_by_day(plans)
            .into_iter()
            .filter(AggregatedPlan::is_upcoming)
            .collect();
        groups.sort_by_key(|g| g.expiry_days);
        groups
    }

    pub fn upcoming_summary(&self, plans: &[Plan]) -> UpcomingPlans {
        let plans = self.upcoming(plans);
        UpcomingPlans {
            nearest_expiry: plans.first().map(|g| g.expiry_days),
            show_see_all: plans.len() > SEE_ALL_THRESHOLD,
            plans,
        }
    }

    /// Calendar view: months in first-seen order, groups in first-seen order
    pub fn by_month(&self, plans: &[Plan]) -> Vec<MonthGroup> {
        let mut months: Vec<MonthGroup> = Vec::new();
        for (plan, day) in self.dated(plans) {
            let index = match months
                .iter()
                .position(|m| m.year == day.year() && m.month == day.month())
            {
                Some(index) => index,
                None => {
                    months.push(MonthGroup {
                        label: day.format("%B %Y").to_string(),
                        year: day.year(),
                        month: day.month(),
                        plans: Vec::new(),
                    });
                    months.len() - 1
                }
            };
            self.merge_into(&mut months[index].plans, plan, day);
        }
        months
    }

    /// Distinct positive expiry days across all plans, ascending
    pub fn upcoming_expiry_days(&self, plans: &[Plan]) -> Vec<i64> {
        let mut days: Vec<i64> = self
            .dated(plans)
            .map(|(_, day)| expiry_days(day, self.today))
            .filter(|d| *d > 0)
            .collect();
        days.sort_unstable();
        days.dedup();
        days
    }

    /// Quick plans expiring in exactly `days` days, merged by day
    pub fn quick_plans_expiring_in(&self, plans: &[Plan], days: i64) -> Vec<AggregatedPlan> {
        let mut groups = Vec::new();
        for (plan, day) in self.dated(plans) {
            if plan.plan_type == QUICK_PLAN_TYPE && expiry_days(day, self.today) == days {
                self.merge_into(&mut groups, plan, day);
            }
        }
        groups
    }

    /// Media of every plan sharing type and calendar day with `plan_id`
    pub fn plan_events(&self, plans: &[Plan], plan_id: &str) -> Vec<MediaItem> {
        let anchor = match plans.iter().find(|p| p.id == plan_id) {
            Some(plan) => plan,
            None => return Vec::new(),
        };
        let anchor_day = match anchor.calendar_day() {
            Some(day) => day,
            None => return Vec::new(),
        };

        let mut items = Vec::new();
        for (plan, day) in self.dated(plans) {
            if plan.plan_type != anchor.plan_type || day != anchor_day {
                continue;
            }

            let likes = plan.like_count();
            let amount_paid = plan.amount_paid();

            if let Some(place) = &plan.place {
                items.extend(place.photos.iter().map(|photo| MediaItem {
                    url: photo.url.clone(),
                    title: place.place_name.title.clone(),
                    likes,
                    amount_paid,
                    plan_id: plan.id.clone(),
                }));
            }
            if let Some(myelin) = &plan.myelin {
                if let Some(file) = &myelin.file {
                    items.push(MediaItem {
                        url: file.display_url().to_string(),
                        title: myelin.place_name.title.clone(),
                        likes,
                        amount_paid,
                        plan_id: plan.id.clone(),
                    });
                }
            }
        }
        items
    }
}
