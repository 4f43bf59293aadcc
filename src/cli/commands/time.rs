use crate::cli::parser::Commands;
use crate::context::AppContext;
use crate::core::clock::{Clock, SystemClock, offset_minutes_to};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::utils::date::{format_local, parse_datetime};
use chrono::Utc;

pub fn handle(cmd: &Commands, ctx: &mut AppContext) -> AppResult<()> {
    if let Commands::Time {
        show,
        set,
        advance_days,
        advance_hours,
        reset,
    } = cmd
    {
        let before = ctx.config.time_offset_minutes;
        let mut offset = before;

        if *reset {
            offset = 0;
        }
        if let Some(target) = set {
            let at = parse_datetime(target).ok_or_else(|| AppError::InvalidDate(target.clone()))?;
            offset = offset_minutes_to(at, Utc::now());
        }
        offset = advanced(offset, advance_days.unwrap_or(0), advance_hours.unwrap_or(0))
            .ok_or_else(|| AppError::InvalidDate("time offset overflows".into()))?;

        // rejects out-of-range offsets before anything is saved
        let clock = SystemClock::with_offset_minutes(offset)?;

        if offset != before {
            ctx.config.time_offset_minutes = offset;
            ctx.save_config()?;
            success(format!("Time offset set to {} minute(s)", offset));
        }

        if *show || offset != before {
            info(format!("Current time: {}", format_local(clock.now())));
            if offset != 0 {
                info(format!("Offset from the real clock: {} minute(s)", offset));
            }
        }
    }

    Ok(())
}

/// `offset` moved by whole days and hours; `None` on overflow.
fn advanced(offset: i64, days: i64, hours: i64) -> Option<i64> {
    let days = days.checked_mul(24 * 60)?;
    let hours = hours.checked_mul(60)?;
    offset.checked_add(days)?.checked_add(hours)
}
