use serde::{Deserialize, Serialize};

/// The part of a Strava activity this service renders.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Meters.
    #[serde(default)]
    pub distance: f64,
    /// Meters.
    #[serde(default)]
    pub total_elevation_gain: f64,
    /// Seconds.
    #[serde(default)]
    pub moving_time: u64,
    /// Seconds.
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub start_date: Option<String>,
}

impl Activity {
    pub fn is_run(&self) -> bool {
        self.kind.eq_ignore_ascii_case("run")
    }
}

/// First run in list order. Strava lists newest first.
pub fn most_recent_run(activities: &[Activity]) -> Option<&Activity> {
    activities.iter().find(|activity| activity.is_run())
}

#[derive(Serialize, Debug, PartialEq)]
pub struct RunSummary {
    pub id: u64,
    pub name: String,
    pub start_date: Option<String>,
    pub distance_m: f64,
    pub distance_km: f64,
    pub elevation_gain_m: f64,
    pub moving_time_s: u64,
    pub elapsed_time_s: u64,
    pub duration: String,
}

impl From<&Activity> for RunSummary {
    fn from(activity: &Activity) -> Self {
        RunSummary {
            id: activity.id,
            name: activity.name.clone(),
            start_date: activity.start_date.clone(),
            distance_m: activity.distance,
            distance_km: (activity.distance / 10.0).round() / 100.0,
            elevation_gain_m: activity.total_elevation_gain,
            moving_time_s: activity.moving_time,
            elapsed_time_s: activity.elapsed_time,
            duration: format_duration(activity.moving_time),
        }
    }
}

fn format_duration(seconds: u64) -> String {
    format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    )
}
