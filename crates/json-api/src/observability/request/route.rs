//! Route templates for span names and metric labels.

use uuid::Uuid;

/// Collapse UUID path segments so that every user resolves to one route.
pub(super) fn template(path: &str) -> String {
    let trimmed = path.trim_matches('/');

    if trimmed.is_empty() {
        return "/".to_owned();
    }

    trimmed
        .split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .fold(String::new(), |mut route, segment| {
            route.push('/');
            route.push_str(segment);
            route
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_replaced() {
        assert_eq!(
            template("/api/users/0192e4a8-7b2c-7d1e-9f00-3c4d5e6f7a8b/activity"),
            "/api/users/{uuid}/activity"
        );
    }

    #[test]
    fn plain_paths_are_kept() {
        assert_eq!(template("/api/auth/login"), "/api/auth/login");
        assert_eq!(template("/api/activity-log/"), "/api/activity-log");
    }

    #[test]
    fn root_path_stays_root() {
        assert_eq!(template("/"), "/");
        assert_eq!(template(""), "/");
    }
}
