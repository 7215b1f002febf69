use std::collections::BTreeMap;

use chrono::{NaiveTime, Weekday};

// Weekly opening hours, stored as a JSON object keyed by short day name,
// e.g. {"Mon": "11:00-21:00"}
#[derive(Debug, Clone)]
pub struct Hours(BTreeMap<String, OpenInterval>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenInterval{
    pub open: NaiveTime,
    pub close: NaiveTime
}

pub fn day_key(weekday: Weekday) -> &'static str{
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

impl Hours {
    pub fn parse(json: &str) -> Result<Hours, String>{
        let raw: BTreeMap<String, String> = serde_json::from_str(json)
            .map_err(|_| "hours is not a valid JSON object of day -> interval".to_string())?;

        let mut intervals = BTreeMap::new();
        for (day, interval) in raw {
            if !["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].contains(&day.as_str()){
                return Err(format!("{} is not a valid day key", day))
            }

            let (open, close) = interval
                .split_once('-')
                .ok_or_else(|| format!("{} is not an open-close interval", interval))?;

            let open = NaiveTime::parse_from_str(open, "%H:%M")
                .map_err(|_| format!("{} is not a valid opening time", open))?;
            let close = NaiveTime::parse_from_str(close, "%H:%M")
                .map_err(|_| format!("{} is not a valid closing time", close))?;

            if close <= open {
                return Err(format!("{} closes before it opens", interval))
            }

            intervals.insert(day, OpenInterval{open, close});
        }

        Ok(Hours(intervals))
    }

    pub fn interval_for(&self, weekday: Weekday) -> Option<OpenInterval>{
        self.0.get(day_key(weekday)).copied()
    }

    // Open-close bounds are both bookable, matching how listings advertise
    // a closing-time seating
    pub fn is_open_at(&self, weekday: Weekday, time: NaiveTime) -> bool{
        match self.interval_for(weekday) {
            Some(interval) => time >= interval.open && time <= interval.close,
            None => false
        }
    }
}
