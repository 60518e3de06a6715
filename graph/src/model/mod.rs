mod diff;
pub mod events;

pub use events::{EventBus, GraphEvent, Subscription};

use crate::core::{Commit, EdgeId, Graph, Node, NodeId, NodeRow};
use crate::decor::{BranchDecorator, GraphDecorator, GraphView};
use crate::error::Result;
use crate::fragment::{Fragment, FragmentGenerator, FragmentManager};
use crate::layout::GraphBuilder;
use crate::query::BranchFilter;
use diff::RowSignature;
use std::collections::HashSet;
use std::fmt;
use std::sync::mpsc::Receiver;
use tracing::debug;

type StartNodes = Box<dyn Fn(&Node) -> bool>;

/// Owns the graph and both overlays, and tells listeners which visible rows
/// changed after every mutation.
///
/// All mutating calls take `&mut self`; the model is meant to be driven from
/// a single thread.
pub struct GraphModel {
    graph: Graph,
    builder: GraphBuilder,
    fragments: FragmentManager,
    generator: FragmentGenerator,
    filter: BranchFilter,
    /// Selected branch heads, re-evaluated after every structural change
    start_nodes: Option<StartNodes>,
    rows: Vec<NodeRow>,
    signatures: Vec<RowSignature>,
    events: EventBus,
}

impl GraphModel {
    /// Lay out `commits` (newest first); an empty log is rejected
    pub fn new(commits: &[Commit]) -> Result<Self> {
        let mut builder = GraphBuilder::new();
        let graph = builder.build(commits)?;

        let mut model = Self {
            graph,
            builder,
            fragments: FragmentManager::new(),
            generator: FragmentGenerator::new(),
            filter: BranchFilter::new(),
            start_nodes: None,
            rows: Vec::new(),
            signatures: Vec::new(),
            events: EventBus::new(),
        };
        model.publish();
        Ok(model)
    }

    /// Use a configured generator for fragment lookups
    pub fn with_generator(mut self, generator: FragmentGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn fragments(&self) -> &FragmentManager {
        &self.fragments
    }

    /// The graph as shown: fragment overlay first, branch filter on top
    pub fn view(&self) -> GraphView<'_, BranchDecorator<'_, FragmentManager>> {
        GraphView::new(
            &self.graph,
            BranchDecorator::new(&self.fragments, self.filter.reachable()),
        )
    }

    /// Visible rows, reindexed from 0
    pub fn node_rows(&self) -> &[NodeRow] {
        &self.rows
    }

    pub fn commit_node_in_row(&self, index: usize) -> Option<NodeId> {
        self.rows
            .get(index)?
            .nodes
            .iter()
            .copied()
            .find(|&id| self.graph.node(id).is_commit())
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GraphEvent) + 'static) -> Subscription {
        self.events.subscribe(listener)
    }

    pub fn subscribe_channel(&mut self) -> (Subscription, Receiver<GraphEvent>) {
        self.events.subscribe_channel()
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.events.unsubscribe(subscription)
    }

    /// Continue the graph with older commits
    pub fn append_commits(&mut self, commits: &[Commit]) -> Result<()> {
        let rebuilt = self.builder.append(&mut self.graph, commits)?;
        debug!(?rebuilt, "appended commits");
        self.update();
        Ok(())
    }

    /// Show only history reachable from nodes matching `is_start`.
    ///
    /// The predicate is kept and re-applied when commits are appended.
    pub fn set_visible_branches(&mut self, is_start: impl Fn(&Node) -> bool + 'static) {
        self.start_nodes = Some(Box::new(is_start));
        self.update();
    }

    /// Fallible form of [`set_visible_branches`](Self::set_visible_branches).
    ///
    /// The predicate runs once; its error is returned unchanged and the
    /// previous filter stays in place.
    pub fn try_set_visible_branches<F, E>(&mut self, mut is_start: F) -> std::result::Result<(), E>
    where
        F: FnMut(&Node) -> std::result::Result<bool, E>,
    {
        let mut starts = HashSet::new();
        let reachable = BranchFilter::try_reachable_from(&self.graph, &self.fragments, |node| {
            let start = is_start(node)?;
            if start {
                starts.insert(node.id());
            }
            Ok(start)
        })?;

        self.start_nodes = Some(Box::new(move |node| starts.contains(&node.id())));
        self.filter.set(reachable);
        self.publish();
        Ok(())
    }

    pub fn show_all_branches(&mut self) {
        self.start_nodes = None;
        self.filter.clear();
        self.publish();
    }

    /// Smallest collapsible fragment below `node`
    pub fn short_fragment(&self, node: NodeId) -> Option<Fragment> {
        self.generator
            .short_fragment(&self.graph, &self.fragments, node)
    }

    /// Longest collapsible run below `node`
    pub fn maximum_down_fragment(&self, node: NodeId) -> Option<Fragment> {
        self.generator
            .maximum_down_fragment(&self.graph, &self.fragments, node)
    }

    pub fn hide_fragment(&mut self, fragment: Fragment) -> Result<EdgeId> {
        let edge = self.fragments.hide(&mut self.graph, fragment)?;
        self.update();
        Ok(edge)
    }

    pub fn show_fragment(&mut self, fragment: &Fragment) -> Result<Fragment> {
        let fragment = self.fragments.show(&mut self.graph, fragment)?;
        self.update();
        Ok(fragment)
    }

    /// Expand the fragment collapsed below `node`, or collapse the longest
    /// run below it. Returns false when there was nothing to do.
    pub fn toggle_fragment(&mut self, node: NodeId) -> Result<bool> {
        if let Some(edge) = self.fragments.hide_fragment_down_edge(&self.graph, node) {
            self.fragments.show_edge(&mut self.graph, edge)?;
            self.update();
            return Ok(true);
        }

        match self.maximum_down_fragment(node) {
            Some(fragment) if !fragment.is_trivial() => {
                self.hide_fragment(fragment)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Collapse every collapsible run, top to bottom. Returns the number of
    /// fragments hidden.
    pub fn hide_all(&mut self) -> Result<usize> {
        let nodes: Vec<NodeId> = self
            .graph
            .all_rows()
            .iter()
            .flat_map(|row| row.nodes.iter().copied())
            .collect();

        let mut hidden = 0;
        let mut result = Ok(());
        for node in nodes {
            if !self.graph.node(node).is_visible()
                || self.fragments.hide_fragment_down_edge(&self.graph, node).is_some()
            {
                continue;
            }
            let Some(fragment) = self.maximum_down_fragment(node) else {
                continue;
            };
            if fragment.is_trivial() {
                continue;
            }
            if let Err(err) = self.fragments.hide(&mut self.graph, fragment) {
                result = Err(err);
                break;
            }
            hidden += 1;
        }

        // Listeners hear about whatever was hidden, even after an error
        if hidden > 0 {
            self.update();
        }
        result.map(|()| hidden)
    }

    /// Expand every hidden fragment, nested ones included
    pub fn show_all(&mut self) -> Result<usize> {
        let mut shown = 0;
        let mut result = Ok(());
        'outer: loop {
            let outermost = self.fragments.outermost(&self.graph);
            if outermost.is_empty() {
                break;
            }
            for fragment in &outermost {
                if let Err(err) = self.fragments.show(&mut self.graph, fragment) {
                    result = Err(err);
                    break 'outer;
                }
                shown += 1;
            }
        }

        if shown > 0 {
            self.update();
        }
        result.map(|()| shown)
    }

    /// Re-run the branch filter after a structural change, then publish
    fn update(&mut self) {
        if let Some(is_start) = &self.start_nodes {
            let reachable =
                BranchFilter::reachable_from(&self.graph, &self.fragments, |node| is_start(node));
            self.filter.set(reachable);
        }
        self.publish();
    }

    /// Refresh the visible rows and announce the block that changed
    fn publish(&mut self) {
        let (rows, signatures) = {
            let view = self.view();
            let rows = view.node_rows();
            let signatures = diff::snapshot(&view, &rows);
            (rows, signatures)
        };

        let replaced = diff::replaced_range(&self.signatures, &signatures);
        self.rows = rows;
        self.signatures = signatures;

        if let Some((old, new)) = replaced {
            debug!(?old, ?new, "visible rows replaced");
            self.events.emit(&GraphEvent::Replace { old, new });
        }
    }
}

impl fmt::Debug for GraphModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphModel")
            .field("rows", &self.graph.row_count())
            .field("visible_rows", &self.rows.len())
            .field("hidden_fragments", &self.fragments.hidden_count())
            .field("branch_filter", &self.filter.is_active())
            .field("events", &self.events)
            .finish()
    }
}
