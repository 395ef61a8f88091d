// ── Shared scripts ──
//
// Scripts present on every device of a selection, by filename. Only
// these may be offered as group actions.

use std::collections::HashSet;
use std::sync::Arc;

use ledfleet_api::Script;
use tracing::debug;

use crate::device::DeviceHandle;

/// Intersect script lists by filename.
///
/// The result keeps the first list's order with duplicates removed.
/// No lists yields nothing; a single list is returned unmodified.
pub fn intersect_scripts<I>(lists: I) -> Vec<Script>
where
    I: IntoIterator<Item = Vec<Script>>,
{
    let mut lists = lists.into_iter();
    let Some(first) = lists.next() else {
        return Vec::new();
    };
    let Some(second) = lists.next() else {
        return first;
    };

    let mut seen = HashSet::new();
    let mut running: Vec<Script> = first
        .into_iter()
        .filter(|s| seen.insert(s.filename.clone()))
        .collect();

    for list in std::iter::once(second).chain(lists) {
        let present: HashSet<&str> = list.iter().map(|s| s.filename.as_str()).collect();
        running.retain(|s| present.contains(s.filename.as_str()));
        if running.is_empty() {
            break;
        }
    }
    running
}

/// Scripts present on every device in `devices`, using cached configs.
///
/// Devices are read in order and the search stops as soon as the running
/// intersection is empty. A device whose config cannot be fetched has no
/// known scripts, so the result is empty.
pub async fn shared_scripts(devices: &[Arc<DeviceHandle>]) -> Vec<Script> {
    let mut running: Option<Vec<Script>> = None;

    for device in devices {
        let scripts = match device.scripts(false).await {
            Ok(scripts) => scripts,
            Err(error) => {
                debug!(device = %device.name(), %error, "no scripts for intersection");
                return Vec::new();
            }
        };
        let next = match running.take() {
            None => scripts,
            Some(current) => intersect_scripts([current, scripts]),
        };
        if next.is_empty() {
            return next;
        }
        running = Some(next);
    }

    running.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scripts(names: &[&str]) -> Vec<Script> {
        names.iter().map(|n| Script::new(*n)).collect()
    }

    fn names(scripts: &[Script]) -> Vec<&str> {
        scripts.iter().map(|s| s.filename.as_str()).collect()
    }

    #[test]
    fn no_lists_is_empty() {
        assert!(intersect_scripts(Vec::<Vec<Script>>::new()).is_empty());
    }

    #[test]
    fn single_list_is_returned_unmodified() {
        let only = vec![
            Script::with_name("fire", "Camp Fire"),
            Script::new("ocean"),
            Script::new("fire"),
        ];
        let result = intersect_scripts([only.clone()]);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].label(), "Camp Fire");
    }

    #[test]
    fn three_way_intersection() {
        let result = intersect_scripts([
            scripts(&["a", "b", "c"]),
            scripts(&["b", "c", "d"]),
            scripts(&["c"]),
        ]);
        assert_eq!(names(&result), ["c"]);
    }

    #[test]
    fn keeps_first_order_and_display_names() {
        let result = intersect_scripts([
            vec![
                Script::with_name("ocean", "Ocean Waves"),
                Script::new("fire"),
                Script::new("ocean"),
            ],
            scripts(&["fire", "ocean"]),
        ]);
        assert_eq!(names(&result), ["ocean", "fire"]);
        assert_eq!(result[0].label(), "Ocean Waves");
    }

    #[test]
    fn same_set_regardless_of_device_order() {
        let a = scripts(&["x", "y", "z"]);
        let b = scripts(&["z", "y", "w"]);
        let forward: HashSet<_> = intersect_scripts([a.clone(), b.clone()]).into_iter().collect();
        let backward: HashSet<_> = intersect_scripts([b, a]).into_iter().collect();
        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_member_empties_result() {
        let result = intersect_scripts([scripts(&["a"]), Vec::new(), scripts(&["a"])]);
        assert!(result.is_empty());
    }
}
