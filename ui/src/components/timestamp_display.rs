use jiff::{Timestamp, tz};
use yew::prelude::*;

use crate::utils::time::{clinic_timezone, format_timestamp};

/// A timestamp shown in clinic time.
///
/// When the browser is in a different timezone the time is marked (italics
/// and a border) with a tooltip, since staff book and administer doses in
/// clinic time.
#[derive(Properties, PartialEq)]
pub struct TimestampDisplayProps {
    pub timestamp: Timestamp,
}

#[function_component]
pub fn TimestampDisplay(props: &TimestampDisplayProps) -> Html {
    let formatted = format_timestamp(props.timestamp);
    let user_offset = tz::TimeZone::system().to_offset(props.timestamp);
    let clinic_offset = clinic_timezone().to_offset(props.timestamp);

    if user_offset != clinic_offset {
        html! {
            <span
                class="italic border border-neutral-400 dark:border-neutral-500 px-1 rounded cursor-help"
                title={format!("Clinic time (UTC{clinic_offset})")}
            >
                {formatted}
            </span>
        }
    } else {
        html! {
            <span>{formatted}</span>
        }
    }
}
