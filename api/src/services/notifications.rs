//! Assembly of the cross-feature notification panel.
//!
//! The grading service reports per-channel activity flags; this module merges
//! them with static display copy into an ordered, display-ready list.

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use content::{ContentStore, CourseKey, find_peer_grading_unit};

use crate::services::ora::GradingService;

/// Static copy attached to a channel.
pub struct ChannelText {
    pub description: &'static str,
    pub alert_message: &'static str,
}

impl ChannelText {
    /// Default for channels with no configured copy.
    pub const EMPTY: ChannelText = ChannelText {
        description: "",
        alert_message: "",
    };
}

/// One notification channel: the service tag that feeds it, the grading
/// route it links to, and its display copy.
///
/// Channel order in [`NOTIFICATION_CHANNELS`] is display order. Adding a
/// channel is a data change here, not a code change.
pub struct ChannelDef {
    /// Key in the grading-service response.
    pub tag: &'static str,
    /// Route suffix under the course grading group.
    pub route: &'static str,
    /// Display name.
    pub name: &'static str,
    pub text: ChannelText,
    /// Only include the channel when the course has a reachable
    /// peer-grading unit.
    pub requires_peer_unit: bool,
}

pub const NOTIFICATION_CHANNELS: &[ChannelDef] = &[
    ChannelDef {
        tag: "Peer Grading",
        route: "peer",
        name: "Peer Grading",
        text: ChannelText {
            description: "View all problems that require peer assessment in this particular course.",
            alert_message: "New submissions to grade",
        },
        requires_peer_unit: true,
    },
    ChannelDef {
        tag: "Staff Grading",
        route: "staff",
        name: "Staff Grading",
        text: ChannelText {
            description: "View ungraded submissions submitted by students for the open ended problems in the course.",
            alert_message: "New submissions to grade",
        },
        requires_peer_unit: false,
    },
    ChannelDef {
        tag: "Problems you have submitted",
        route: "problems",
        name: "Problems you have submitted",
        text: ChannelText {
            description: "View open ended problems that you have previously submitted for grading.",
            alert_message: "New grades have been returned",
        },
        requires_peer_unit: false,
    },
    ChannelDef {
        tag: "Flagged Submissions",
        route: "flagged",
        name: "Flagged Submissions",
        text: ChannelText {
            description: "View submissions that have been flagged by students as inappropriate.",
            alert_message: "Submissions have been flagged for review",
        },
        requires_peer_unit: false,
    },
];

/// A display-ready notification entry.
#[derive(Debug, Serialize)]
pub struct NotificationItem {
    pub url: String,
    pub name: String,
    pub alert: bool,
    pub description: String,
    pub alert_message: String,
}

/// Merges the grading service's activity flags into the ordered channel list.
///
/// Channels the service did not mention are dropped. The peer grading channel
/// is dropped when the course has no reachable peer-grading unit, whatever
/// activity the service reported: the panel must never link to a unit that
/// does not exist. A service failure degrades to an empty panel.
pub async fn combined_notifications(
    store: &ContentStore,
    grader: &dyn GradingService,
    course_key: &CourseKey,
    student_id: &str,
    base_course_url: &str,
) -> Vec<NotificationItem> {
    let course_id = course_key.to_string();
    let response = match grader.get_combined_notifications(&course_id, student_id).await {
        Ok(response) => response,
        Err(err) => {
            warn!(
                course = %course_id,
                error = %err,
                "Could not fetch notifications from the grading service"
            );
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for channel in NOTIFICATION_CHANNELS {
        let Some(has_alert) = response.get(channel.tag).and_then(Value::as_bool) else {
            continue;
        };

        if channel.requires_peer_unit
            && find_peer_grading_unit(store, course_key, base_course_url).is_none()
        {
            continue;
        }

        items.push(NotificationItem {
            url: format!("/api/courses/{}/grading/{}", course_key, channel.route),
            name: channel.name.to_string(),
            alert: has_alert,
            description: channel.text.description.to_string(),
            alert_message: channel.text.alert_message.to_string(),
        });
    }

    items
}
