//! Diff two snapshots into route mutations and apply them.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::routing::table::{RouteEntry, RouteError, RouteTable};
use crate::snapshot::{FeedRoute, Snapshot};

/// One mutation of the route table.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOp {
    /// Path is new in this snapshot.
    Add(RouteEntry),
    /// Path is served by both snapshots; swap the payload in place.
    Replace(RouteEntry),
    /// Path is gone from this snapshot.
    Remove(FeedRoute),
}

impl RouteOp {
    pub fn path(&self) -> &str {
        match self {
            RouteOp::Add(entry) | RouteOp::Replace(entry) => &entry.path,
            RouteOp::Remove(route) => &route.path,
        }
    }
}

/// Counts reported after a republish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepublishSummary {
    pub added: usize,
    pub replaced: usize,
    pub removed: usize,
}

/// Ordered mutations taking the table from one snapshot to the next.
///
/// Additions come first and removals last, so a path that exists in both
/// snapshots is never absent from the table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutePlan {
    ops: Vec<RouteOp>,
}

impl RoutePlan {
    pub fn between(old: Option<&Snapshot>, new: &Snapshot) -> Self {
        let old_routes = old.map(Snapshot::routes).unwrap_or_default();
        let previous: HashSet<&str> = old_routes.iter().map(|r| r.path.as_str()).collect();

        let mut adds = Vec::new();
        let mut replaces = Vec::new();
        for feed in new.feeds() {
            let entry = RouteEntry::from_feed(feed, new.generation());
            if previous.contains(feed.path.as_str()) {
                replaces.push(RouteOp::Replace(entry));
            } else {
                adds.push(RouteOp::Add(entry));
            }
        }

        let removes = old_routes
            .iter()
            .filter(|route| new.feeds().iter().all(|feed| feed.path != route.path))
            .map(|route| RouteOp::Remove(route.clone()));

        let mut ops = adds;
        ops.append(&mut replaces);
        ops.extend(removes);
        Self { ops }
    }

    pub fn ops(&self) -> &[RouteOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn summary(&self) -> RepublishSummary {
        self.ops.iter().fold(RepublishSummary::default(), |mut s, op| {
            match op {
                RouteOp::Add(_) => s.added += 1,
                RouteOp::Replace(_) => s.replaced += 1,
                RouteOp::Remove(_) => s.removed += 1,
            }
            s
        })
    }
}

/// How to reverse a single applied op.
#[derive(Debug)]
pub enum Undo {
    Unregister(String),
    Restore(Arc<RouteEntry>),
    Nothing,
}

/// Apply one op to the table.
pub fn apply(table: &RouteTable, op: &RouteOp) -> Result<Undo, RouteError> {
    match op {
        RouteOp::Add(entry) => {
            table.register(entry.clone())?;
            Ok(Undo::Unregister(entry.path.clone()))
        }
        RouteOp::Replace(entry) => table.replace(entry.clone()).map(Undo::Restore),
        RouteOp::Remove(route) => Ok(match table.unregister(&route.path) {
            Some(previous) => Undo::Restore(previous),
            None => {
                tracing::warn!(path = %route.path, "Feed route already absent during removal");
                Undo::Nothing
            }
        }),
    }
}

fn revert(table: &RouteTable, undo: Undo) {
    match undo {
        Undo::Unregister(path) => {
            table.unregister(&path);
        }
        Undo::Restore(previous) => table.restore(previous),
        Undo::Nothing => {}
    }
}

/// Move the route table from `old` to `new`. On the first refused op every
/// op already applied is reverted, leaving the table as it was.
pub fn republish(
    table: &RouteTable,
    old: Option<&Snapshot>,
    new: &Snapshot,
) -> Result<RepublishSummary, RouteError> {
    let plan = RoutePlan::between(old, new);
    let mut undo_log = Vec::with_capacity(plan.ops().len());

    for op in plan.ops() {
        match apply(table, op) {
            Ok(undo) => undo_log.push(undo),
            Err(e) => {
                tracing::warn!(
                    path = %op.path(),
                    error = %e,
                    applied = undo_log.len(),
                    "Route republish refused, rolling back"
                );
                for undo in undo_log.into_iter().rev() {
                    revert(table, undo);
                }
                return Err(e);
            }
        }
    }

    let summary = plan.summary();
    tracing::info!(
        generation = new.generation(),
        added = summary.added,
        replaced = summary.replaced,
        removed = summary.removed,
        "Feed routes republished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::site::{FeedConfig, SitemapConfig};
    use crate::content::{Content, RawContent, SiteConfig, Tag};
    use crate::snapshot::{build_snapshot, FeedKind};

    fn snapshot(site: SiteConfig, generation: u64) -> Snapshot {
        let raw = RawContent {
            site,
            tags: vec![Tag::new("rust", "Rust", "about rust")],
            posts: Vec::new(),
            links: Vec::new(),
        };
        build_snapshot(Content::from_raw(raw).unwrap(), generation).unwrap()
    }

    fn rss_atom() -> SiteConfig {
        let mut site = SiteConfig::new("Blog", "https://example.com/");
        site.rss = Some(FeedConfig::at("/rss.xml"));
        site.atom = Some(FeedConfig::at("/atom.xml"));
        site
    }

    fn rss_sitemap() -> SiteConfig {
        let mut site = SiteConfig::new("Blog", "https://example.com/");
        site.rss = Some(FeedConfig::at("/rss.xml"));
        site.sitemap = Some(SitemapConfig::at("/sitemap.xml"));
        site
    }

    #[test]
    fn test_plan_orders_add_replace_remove() {
        let old = snapshot(rss_atom(), 1);
        let new = snapshot(rss_sitemap(), 2);

        let plan = RoutePlan::between(Some(&old), &new);
        let paths: Vec<(&str, &str)> = plan
            .ops()
            .iter()
            .map(|op| {
                let kind = match op {
                    RouteOp::Add(_) => "add",
                    RouteOp::Replace(_) => "replace",
                    RouteOp::Remove(_) => "remove",
                };
                (kind, op.path())
            })
            .collect();

        assert_eq!(
            paths,
            vec![
                ("add", "/sitemap.xml"),
                ("replace", "/rss.xml"),
                ("remove", "/atom.xml"),
            ]
        );
        assert_eq!(
            plan.summary(),
            RepublishSummary {
                added: 1,
                replaced: 1,
                removed: 1
            }
        );
    }

    #[test]
    fn test_retained_route_never_disappears() {
        let table = RouteTable::new();
        let old = snapshot(rss_atom(), 1);
        republish(&table, None, &old).unwrap();

        let new = snapshot(rss_sitemap(), 2);
        let plan = RoutePlan::between(Some(&old), &new);

        // A request can land between any two ops
        for op in plan.ops() {
            apply(&table, op).unwrap();
            let served = table.dispatch("/rss.xml").expect("rss must stay routable");
            assert_eq!(served.kind, FeedKind::Rss);
        }

        assert_eq!(table.dispatch("/rss.xml").unwrap().generation, 2);
        assert!(table.dispatch("/sitemap.xml").is_some());
        assert!(table.dispatch("/atom.xml").is_none());
    }

    #[test]
    fn test_refused_op_rolls_back() {
        let table = RouteTable::new().reserve("/sitemap.xml", "webhook");
        let mut site = SiteConfig::new("Blog", "https://example.com/");
        site.atom = Some(FeedConfig::at("/atom.xml"));
        let old = snapshot(site, 1);
        republish(&table, None, &old).unwrap();
        let before = table.routes();

        // rss is added before the sitemap add is refused
        let mut site = rss_atom();
        site.sitemap = Some(SitemapConfig::at("/sitemap.xml"));
        let new = snapshot(site, 2);

        let err = republish(&table, Some(&old), &new).unwrap_err();
        assert_eq!(err.path(), "/sitemap.xml");
        assert_eq!(table.routes(), before);
        assert!(table.dispatch("/rss.xml").is_none());
        assert_eq!(table.dispatch("/atom.xml").unwrap().generation, 1);
    }

    #[test]
    fn test_rollback_restores_replaced_payload() {
        let table = RouteTable::new();
        let old = snapshot(rss_atom(), 1);
        republish(&table, None, &old).unwrap();

        // Simulate a partially applied plan: replace succeeded, then revert
        let new = snapshot(rss_atom(), 2);
        let plan = RoutePlan::between(Some(&old), &new);
        let undo: Vec<Undo> = plan.ops().iter().map(|op| apply(&table, op).unwrap()).collect();
        assert_eq!(table.dispatch("/atom.xml").unwrap().generation, 2);

        for u in undo.into_iter().rev() {
            revert(&table, u);
        }
        assert_eq!(table.dispatch("/rss.xml").unwrap().generation, 1);
        assert_eq!(table.dispatch("/atom.xml").unwrap().generation, 1);
    }
}
