use chrono::{DateTime, Utc};

use crate::models::{DocumentRequest, RequestStatus};

/// Shown in place of a release date that does not exist yet.
pub const RELEASE_DATE_PLACEHOLDER: &str = "-";

/// When the document was released: `printedAt`, falling back to `updatedAt` for older
/// records that were marked ready before `printedAt` existed. `None` unless ready for pick-up.
pub fn release_date(request: &DocumentRequest) -> Option<DateTime<Utc>> {
    match request.status {
        RequestStatus::ReadyForPickup => Some(request.printed_at.unwrap_or(request.updated_at)),
        _ => None,
    }
}

pub fn release_date_label(request: &DocumentRequest) -> String {
    release_date(request)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| RELEASE_DATE_PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::request::fixtures::{at, request_in};

    #[test]
    fn test_ready_uses_printed_at() {
        let mut request = request_in(RequestStatus::ReadyForPickup);
        request.printed_at = Some(at(10));
        request.updated_at = at(14);

        assert_eq!(release_date(&request), Some(at(10)));
        assert_eq!(release_date_label(&request), "2024-03-04");
    }

    #[test]
    fn test_ready_without_printed_at_falls_back() {
        let mut request = request_in(RequestStatus::ReadyForPickup);
        request.updated_at = at(14);

        assert_eq!(release_date(&request), Some(at(14)));
    }

    #[test]
    fn test_other_statuses_have_no_release_date() {
        for status in RequestStatus::ALL.into_iter().filter(|s| *s != RequestStatus::ReadyForPickup) {
            let mut request = request_in(status);
            request.printed_at = Some(at(10));

            assert_eq!(release_date(&request), None);
            assert_eq!(release_date_label(&request), RELEASE_DATE_PLACEHOLDER);
        }
    }
}
