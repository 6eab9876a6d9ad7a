use std::fmt;

/// Navigation targets. Anything unrecognised lands on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    /// `status` seeds the jobs table's status filter.
    Jobs { status: Option<String> },
    Nodes,
    Queues,
}

impl Route {
    pub fn parse(location: &str) -> Route {
        let location = location.trim();
        let (path, query) = location.split_once('?').unwrap_or((location, ""));
        match path.trim_end_matches('/') {
            "/dashboard" | "dashboard" => Route::Dashboard,
            "/jobs" | "jobs" => Route::Jobs {
                status: query_param(query, "status").filter(|s| !s.is_empty()),
            },
            "/nodes" | "nodes" => Route::Nodes,
            "/queues" | "queues" => Route::Queues,
            other => {
                tracing::debug!(path = other, "unknown route, redirecting to /dashboard");
                Route::Dashboard
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Dashboard => write!(f, "/dashboard"),
            Route::Jobs { status: None } => write!(f, "/jobs"),
            Route::Jobs { status: Some(status) } => {
                write!(f, "/jobs?status={}", urlencoding::encode(status))
            }
            Route::Nodes => write!(f, "/nodes"),
            Route::Queues => write!(f, "/queues"),
        }
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('=').or(Some((pair, ""))))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| {
            let v = v.replace('+', " ");
            urlencoding::decode(&v)
                .map(|decoded| decoded.into_owned())
                .unwrap_or(v)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_paths() {
        assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
        assert_eq!(Route::parse("/nodes"), Route::Nodes);
        assert_eq!(Route::parse("/queues/"), Route::Queues);
        assert_eq!(Route::parse("/jobs"), Route::Jobs { status: None });
    }

    #[test]
    fn test_jobs_status_seed() {
        assert_eq!(
            Route::parse("/jobs?status=Running"),
            Route::Jobs {
                status: Some("Running".to_string())
            }
        );
        assert_eq!(
            Route::parse("/jobs?page=2&status=Not%20Ready"),
            Route::Jobs {
                status: Some("Not Ready".to_string())
            }
        );
        assert_eq!(Route::parse("/jobs?status="), Route::Jobs { status: None });
    }

    #[test]
    fn test_unknown_redirects_to_dashboard() {
        assert_eq!(Route::parse(""), Route::Dashboard);
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("/settings"), Route::Dashboard);
    }

    #[test]
    fn test_display_round_trips() {
        let route = Route::Jobs {
            status: Some("Not Ready".to_string()),
        };
        assert_eq!(route.to_string(), "/jobs?status=Not%20Ready");
        assert_eq!(Route::parse(&route.to_string()), route);
    }
}
