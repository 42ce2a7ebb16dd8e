use std::fs;
use std::path::Path;

use super::error::CalcResult;
use super::types::{Schedule, ScheduleEntry};

pub fn schedule_to_json(schedule: &[ScheduleEntry]) -> CalcResult<String> {
    Ok(serde_json::to_string_pretty(schedule)?)
}

pub fn schedule_from_json(json: &str) -> CalcResult<Schedule> {
    Ok(serde_json::from_str(json)?)
}

pub fn write_schedule(path: &Path, schedule: &[ScheduleEntry]) -> CalcResult<()> {
    let json = schedule_to_json(schedule)?;
    fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn read_schedule(path: &Path) -> CalcResult<Schedule> {
    let json = fs::read_to_string(path)?;
    schedule_from_json(&json)
}
