//! Route classification: path prefixes to required-capability categories.
//!
//! The table is configuration, not persisted state; matching is
//! segment-aware so `/administrators` never matches the `/admin` prefix.

/// What a path demands of the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteCategory {
    /// No requirement; also the default for unlisted paths.
    Public,
    /// Only reachable while signed out (login/register pages).
    AuthOnly,
    /// Superadmin panel.
    AdminOnly,
    /// Staff panel; global admins pass too.
    StaffOrAdmin,
    /// Client order portal; global admins pass too.
    CustomerOnly,
}

/// Ordered prefix table. Longest matching prefix wins; order only breaks
/// exact-length ties (first entry wins).
#[derive(Debug, Clone)]
pub struct RouteTable {
    entries: Vec<(Vec<String>, RouteCategory)>,
}

impl RouteTable {
    pub fn new(entries: &[(&str, RouteCategory)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(prefix, category)| (segments(prefix), *category))
                .collect(),
        }
    }

    /// The console's route map.
    pub fn console() -> Self {
        Self::new(&[
            ("/admin", RouteCategory::AdminOnly),
            ("/staff", RouteCategory::StaffOrAdmin),
            ("/portal", RouteCategory::CustomerOnly),
            ("/login", RouteCategory::AuthOnly),
            ("/register", RouteCategory::AuthOnly),
        ])
    }

    pub fn classify(&self, path: &str) -> RouteCategory {
        let path_segments = segments(path);
        let mut best: Option<(usize, RouteCategory)> = None;

        for (prefix, category) in &self.entries {
            if prefix.len() > path_segments.len() {
                continue;
            }
            if prefix.iter().zip(&path_segments).all(|(a, b)| a == b) {
                let longer = best.map_or(true, |(len, _)| prefix.len() > len);
                if longer {
                    best = Some((prefix.len(), *category));
                }
            }
        }

        best.map(|(_, category)| category)
            .unwrap_or(RouteCategory::Public)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::console()
    }
}

fn segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
