//! Extension registry and handler dispatch
//!
//! The registry holds ordered handler lists per stage. It is an ordinary
//! value owned (or shared through `Arc`) by an extractor; mutation needs
//! `&mut`, so concurrent registration is ruled out by the borrow checker.

use super::traits::{
    Cleaner, FeatureFilter, GraphBuilder, PostProcessor, RankingFactory, TextHook, Tokenizer,
};
use super::{Flow, Stage, StageContext};
use crate::error::{ConfigurationError, TermRankResult};
use crate::graph::{EdgeSink, FeatureSequence};
use crate::ranking::{RankedList, RankingAlgorithm};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A stage handler tagged with the extension point it serves.
#[derive(Clone)]
pub enum Handler {
    NewText(Arc<dyn TextHook>),
    CleanText(Arc<dyn Cleaner>),
    GetFeatures(Arc<dyn Tokenizer>),
    FilterFeatures(Arc<dyn FeatureFilter>),
    RankingClass(Arc<dyn RankingFactory>),
    BuildGraph(Arc<dyn GraphBuilder>),
    PostRanking(Arc<dyn PostProcessor>),
}

impl Handler {
    /// The extension point this handler binds to.
    pub fn stage(&self) -> Stage {
        match self {
            Handler::NewText(_) => Stage::NewText,
            Handler::CleanText(_) => Stage::CleanText,
            Handler::GetFeatures(_) => Stage::GetFeatures,
            Handler::FilterFeatures(_) => Stage::FilterFeatures,
            Handler::RankingClass(_) => Stage::RankingClass,
            Handler::BuildGraph(_) => Stage::BuildGraph,
            Handler::PostRanking(_) => Stage::PostRanking,
        }
    }

    pub fn new_text(hook: impl TextHook + 'static) -> Self {
        Handler::NewText(Arc::new(hook))
    }

    pub fn clean_text(cleaner: impl Cleaner + 'static) -> Self {
        Handler::CleanText(Arc::new(cleaner))
    }

    pub fn get_features(tokenizer: impl Tokenizer + 'static) -> Self {
        Handler::GetFeatures(Arc::new(tokenizer))
    }

    pub fn filter_features(filter: impl FeatureFilter + 'static) -> Self {
        Handler::FilterFeatures(Arc::new(filter))
    }

    pub fn ranking_class(factory: impl RankingFactory + 'static) -> Self {
        Handler::RankingClass(Arc::new(factory))
    }

    pub fn build_graph(builder: impl GraphBuilder + 'static) -> Self {
        Handler::BuildGraph(Arc::new(builder))
    }

    pub fn post_ranking(processor: impl PostProcessor + 'static) -> Self {
        Handler::PostRanking(Arc::new(processor))
    }

    /// Bind a closure to `new_text`.
    pub fn new_text_fn<F>(f: F) -> Self
    where
        F: Fn(&mut String, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync + 'static,
    {
        Handler::NewText(Arc::new(FnStage(f)))
    }

    /// Bind a closure to `clean_text`.
    pub fn clean_text_fn<F>(f: F) -> Self
    where
        F: Fn(&mut String, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync + 'static,
    {
        Handler::CleanText(Arc::new(FnStage(f)))
    }

    /// Bind a closure to `get_features`.
    pub fn get_features_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &mut Option<FeatureSequence>, &StageContext<'_>) -> TermRankResult<Flow>
            + Send
            + Sync
            + 'static,
    {
        Handler::GetFeatures(Arc::new(FnStage(f)))
    }

    /// Bind a closure to `filter_features`.
    pub fn filter_features_fn<F>(f: F) -> Self
    where
        F: Fn(&mut FeatureSequence, &StageContext<'_>) -> TermRankResult<Flow>
            + Send
            + Sync
            + 'static,
    {
        Handler::FilterFeatures(Arc::new(FnStage(f)))
    }

    /// Bind a closure to `ranking_class`.
    pub fn ranking_class_fn<F>(f: F) -> Self
    where
        F: Fn(&mut Option<Box<dyn RankingAlgorithm>>, &StageContext<'_>) -> TermRankResult<Flow>
            + Send
            + Sync
            + 'static,
    {
        Handler::RankingClass(Arc::new(FnStage(f)))
    }

    /// Bind a closure to `build_graph`.
    pub fn build_graph_fn<F>(f: F) -> Self
    where
        F: Fn(&[String], &mut dyn EdgeSink, &StageContext<'_>) -> TermRankResult<Flow>
            + Send
            + Sync
            + 'static,
    {
        Handler::BuildGraph(Arc::new(FnStage(f)))
    }

    /// Bind a closure to `post_ranking`.
    pub fn post_ranking_fn<F>(f: F) -> Self
    where
        F: Fn(&mut RankedList, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync + 'static,
    {
        Handler::PostRanking(Arc::new(FnStage(f)))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.stage()).finish()
    }
}

/// Adapts a closure to one of the stage traits.
struct FnStage<F>(F);

impl<F> TextHook for FnStage<F>
where
    F: Fn(&mut String, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync,
{
    fn on_new_text(&self, text: &mut String, ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        (self.0)(text, ctx)
    }
}

impl<F> Cleaner for FnStage<F>
where
    F: Fn(&mut String, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync,
{
    fn clean(&self, text: &mut String, ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        (self.0)(text, ctx)
    }
}

impl<F> Tokenizer for FnStage<F>
where
    F: Fn(&str, &mut Option<FeatureSequence>, &StageContext<'_>) -> TermRankResult<Flow>
        + Send
        + Sync,
{
    fn tokenize(
        &self,
        text: &str,
        features: &mut Option<FeatureSequence>,
        ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow> {
        (self.0)(text, features, ctx)
    }
}

impl<F> FeatureFilter for FnStage<F>
where
    F: Fn(&mut FeatureSequence, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync,
{
    fn filter(&self, features: &mut FeatureSequence, ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        (self.0)(features, ctx)
    }
}

impl<F> RankingFactory for FnStage<F>
where
    F: Fn(&mut Option<Box<dyn RankingAlgorithm>>, &StageContext<'_>) -> TermRankResult<Flow>
        + Send
        + Sync,
{
    fn create(
        &self,
        slot: &mut Option<Box<dyn RankingAlgorithm>>,
        ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow> {
        (self.0)(slot, ctx)
    }
}

impl<F> GraphBuilder for FnStage<F>
where
    F: Fn(&[String], &mut dyn EdgeSink, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync,
{
    fn build(
        &self,
        features: &[String],
        sink: &mut dyn EdgeSink,
        ctx: &StageContext<'_>,
    ) -> TermRankResult<Flow> {
        (self.0)(features, sink, ctx)
    }
}

impl<F> PostProcessor for FnStage<F>
where
    F: Fn(&mut RankedList, &StageContext<'_>) -> TermRankResult<Flow> + Send + Sync,
{
    fn process(&self, ranked: &mut RankedList, ctx: &StageContext<'_>) -> TermRankResult<Flow> {
        (self.0)(ranked, ctx)
    }
}

/// Ordered handler lists, one per extension point.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    pub(crate) new_text: Vec<Arc<dyn TextHook>>,
    pub(crate) clean_text: Vec<Arc<dyn Cleaner>>,
    pub(crate) get_features: Vec<Arc<dyn Tokenizer>>,
    pub(crate) filter_features: Vec<Arc<dyn FeatureFilter>>,
    pub(crate) ranking_class: Vec<Arc<dyn RankingFactory>>,
    pub(crate) build_graph: Vec<Arc<dyn GraphBuilder>>,
    pub(crate) post_ranking: Vec<Arc<dyn PostProcessor>>,
}

impl ExtensionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler to its stage's list.
    ///
    /// With `replace`, the stage's previously registered handlers are
    /// dropped first.
    pub fn register(&mut self, handler: Handler, replace: bool) {
        let stage = handler.stage();
        if replace {
            self.clear(stage);
        }
        match handler {
            Handler::NewText(h) => self.new_text.push(h),
            Handler::CleanText(h) => self.clean_text.push(h),
            Handler::GetFeatures(h) => self.get_features.push(h),
            Handler::FilterFeatures(h) => self.filter_features.push(h),
            Handler::RankingClass(h) => self.ranking_class.push(h),
            Handler::BuildGraph(h) => self.build_graph.push(h),
            Handler::PostRanking(h) => self.post_ranking.push(h),
        }
        trace!(stage = %stage, replace, "handler registered");
    }

    /// Register under an explicit extension-point name.
    ///
    /// The name must match one of the fixed stage names exactly and agree
    /// with the handler's own stage.
    pub fn register_named(
        &mut self,
        name: &str,
        handler: Handler,
        replace: bool,
    ) -> Result<(), ConfigurationError> {
        let stage: Stage = name.parse()?;
        if stage != handler.stage() {
            return Err(ConfigurationError::StageMismatch {
                name: name.to_string(),
                handler: handler.stage(),
            });
        }
        self.register(handler, replace);
        Ok(())
    }

    /// Drop every handler registered for `stage`.
    pub fn clear(&mut self, stage: Stage) {
        match stage {
            Stage::NewText => self.new_text.clear(),
            Stage::CleanText => self.clean_text.clear(),
            Stage::GetFeatures => self.get_features.clear(),
            Stage::FilterFeatures => self.filter_features.clear(),
            Stage::RankingClass => self.ranking_class.clear(),
            Stage::BuildGraph => self.build_graph.clear(),
            Stage::PostRanking => self.post_ranking.clear(),
        }
    }

    /// Number of handlers registered for `stage`.
    pub fn handler_count(&self, stage: Stage) -> usize {
        match stage {
            Stage::NewText => self.new_text.len(),
            Stage::CleanText => self.clean_text.len(),
            Stage::GetFeatures => self.get_features.len(),
            Stage::FilterFeatures => self.filter_features.len(),
            Stage::RankingClass => self.ranking_class.len(),
            Stage::BuildGraph => self.build_graph.len(),
            Stage::PostRanking => self.post_ranking.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Stage::ALL.iter().all(|stage| self.handler_count(*stage) == 0)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for stage in Stage::ALL {
            map.entry(&stage.as_str(), &self.handler_count(stage));
        }
        map.finish()
    }
}

/// The instance-level fallback layer: at most one handler per stage, run
/// after the registry's handlers unless one of them stopped the chain.
#[derive(Clone, Default)]
pub struct DefaultHandlers {
    pub(crate) new_text: Option<Arc<dyn TextHook>>,
    pub(crate) clean_text: Option<Arc<dyn Cleaner>>,
    pub(crate) get_features: Option<Arc<dyn Tokenizer>>,
    pub(crate) filter_features: Option<Arc<dyn FeatureFilter>>,
    pub(crate) ranking_class: Option<Arc<dyn RankingFactory>>,
    pub(crate) build_graph: Option<Arc<dyn GraphBuilder>>,
    pub(crate) post_ranking: Option<Arc<dyn PostProcessor>>,
}

impl DefaultHandlers {
    /// No defaults for any stage
    pub fn none() -> Self {
        Self::default()
    }

    /// Install `handler` as the default for its stage, replacing any previous one.
    pub fn set(&mut self, handler: Handler) {
        match handler {
            Handler::NewText(h) => self.new_text = Some(h),
            Handler::CleanText(h) => self.clean_text = Some(h),
            Handler::GetFeatures(h) => self.get_features = Some(h),
            Handler::FilterFeatures(h) => self.filter_features = Some(h),
            Handler::RankingClass(h) => self.ranking_class = Some(h),
            Handler::BuildGraph(h) => self.build_graph = Some(h),
            Handler::PostRanking(h) => self.post_ranking = Some(h),
        }
    }

    pub fn with(mut self, handler: Handler) -> Self {
        self.set(handler);
        self
    }

    pub fn unset(&mut self, stage: Stage) {
        match stage {
            Stage::NewText => self.new_text = None,
            Stage::CleanText => self.clean_text = None,
            Stage::GetFeatures => self.get_features = None,
            Stage::FilterFeatures => self.filter_features = None,
            Stage::RankingClass => self.ranking_class = None,
            Stage::BuildGraph => self.build_graph = None,
            Stage::PostRanking => self.post_ranking = None,
        }
    }

    pub fn is_set(&self, stage: Stage) -> bool {
        match stage {
            Stage::NewText => self.new_text.is_some(),
            Stage::CleanText => self.clean_text.is_some(),
            Stage::GetFeatures => self.get_features.is_some(),
            Stage::FilterFeatures => self.filter_features.is_some(),
            Stage::RankingClass => self.ranking_class.is_some(),
            Stage::BuildGraph => self.build_graph.is_some(),
            Stage::PostRanking => self.post_ranking.is_some(),
        }
    }
}

impl fmt::Debug for DefaultHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<_> = Stage::ALL
            .iter()
            .filter(|stage| self.is_set(**stage))
            .map(|stage| stage.as_str())
            .collect();
        f.debug_tuple("DefaultHandlers").field(&set).finish()
    }
}

/// Run one stage: registered handlers in order, then the default.
///
/// Returns whether any handler ran. A `Stop` from a registered handler
/// skips the rest of the chain, default included. When `required` is set
/// and nothing ran, fails with [`ConfigurationError::MissingStage`].
pub(crate) fn invoke<H: ?Sized>(
    stage: Stage,
    registered: &[Arc<H>],
    default: Option<&Arc<H>>,
    required: bool,
    mut call: impl FnMut(&H) -> TermRankResult<Flow>,
) -> TermRankResult<bool> {
    let mut called = false;

    for handler in registered {
        called = true;
        if call(&**handler)? == Flow::Stop {
            trace!(stage = %stage, "chain stopped by registered handler");
            return Ok(true);
        }
    }

    if let Some(handler) = default {
        called = true;
        call(&**handler)?;
    }

    if required && !called {
        return Err(ConfigurationError::MissingStage(stage).into());
    }
    Ok(called)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TermRankError;
    use crate::ranking::PageRank;
    use std::sync::Mutex;

    /// Cleaner that appends a marker and reports the configured flow.
    struct Marker {
        mark: &'static str,
        flow: Flow,
    }

    impl Cleaner for Marker {
        fn clean(&self, text: &mut String, _ctx: &StageContext<'_>) -> TermRankResult<Flow> {
            text.push_str(self.mark);
            Ok(self.flow)
        }
    }

    fn marker(mark: &'static str, flow: Flow) -> Handler {
        Handler::clean_text(Marker { mark, flow })
    }

    fn run_clean(
        registry: &ExtensionRegistry,
        default: Option<&Arc<dyn Cleaner>>,
        required: bool,
    ) -> (TermRankResult<bool>, String) {
        let ctx = StageContext::default();
        let mut text = String::new();
        let result = invoke(Stage::CleanText, &registry.clean_text, default, required, |h| {
            h.clean(&mut text, &ctx)
        });
        (result, text)
    }

    #[test]
    fn handlers_run_in_registration_order_then_default() {
        let mut registry = ExtensionRegistry::new();
        registry.register(marker("a", Flow::Continue), false);
        registry.register(marker("b", Flow::Continue), false);
        let default: Arc<dyn Cleaner> = Arc::new(Marker { mark: "d", flow: Flow::Continue });

        let (result, text) = run_clean(&registry, Some(&default), false);
        assert!(result.unwrap());
        assert_eq!(text, "abd");
    }

    #[test]
    fn replace_clears_previous_handlers() {
        let mut registry = ExtensionRegistry::new();
        registry.register(marker("a", Flow::Continue), false);
        registry.register(marker("b", Flow::Continue), false);
        registry.register(marker("c", Flow::Continue), true);
        assert_eq!(registry.handler_count(Stage::CleanText), 1);

        let (_, text) = run_clean(&registry, None, false);
        assert_eq!(text, "c");
    }

    #[test]
    fn stop_skips_later_handlers_and_default() {
        let mut registry = ExtensionRegistry::new();
        registry.register(marker("a", Flow::Stop), false);
        registry.register(marker("b", Flow::Continue), false);
        let default: Arc<dyn Cleaner> = Arc::new(Marker { mark: "d", flow: Flow::Continue });

        let (result, text) = run_clean(&registry, Some(&default), true);
        assert!(result.unwrap());
        assert_eq!(text, "a");
    }

    #[test]
    fn default_alone_counts_as_called() {
        let registry = ExtensionRegistry::new();
        let default: Arc<dyn Cleaner> = Arc::new(Marker { mark: "d", flow: Flow::Stop });

        let (result, text) = run_clean(&registry, Some(&default), true);
        assert!(result.unwrap());
        assert_eq!(text, "d");
    }

    #[test]
    fn nothing_bound_reports_not_called() {
        let registry = ExtensionRegistry::new();
        let (result, text) = run_clean(&registry, None, false);
        assert!(!result.unwrap());
        assert!(text.is_empty());
    }

    #[test]
    fn required_stage_without_handlers_fails() {
        let registry = ExtensionRegistry::new();
        let (result, _) = run_clean(&registry, None, true);
        assert!(matches!(
            result,
            Err(TermRankError::Configuration(ConfigurationError::MissingStage(Stage::CleanText)))
        ));
    }

    #[test]
    fn handler_error_propagates_and_stops_chain() {
        let calls = Arc::new(Mutex::new(0usize));
        let mut registry = ExtensionRegistry::new();
        registry.register(
            Handler::clean_text_fn(|_text: &mut String, _ctx: &StageContext<'_>| {
                Err(TermRankError::handler("boom"))
            }),
            false,
        );
        let counter = calls.clone();
        registry.register(
            Handler::clean_text_fn(move |_text: &mut String, _ctx: &StageContext<'_>| {
                *counter.lock().unwrap() += 1;
                Ok(Flow::Continue)
            }),
            false,
        );

        let (result, _) = run_clean(&registry, None, false);
        assert!(matches!(result, Err(TermRankError::Handler(msg)) if msg == "boom"));
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn register_named_binds_matching_stage() {
        let mut registry = ExtensionRegistry::new();
        registry
            .register_named("clean_text", marker("a", Flow::Continue), false)
            .unwrap();
        assert_eq!(registry.handler_count(Stage::CleanText), 1);
    }

    #[test]
    fn register_named_rejects_unknown_name() {
        let mut registry = ExtensionRegistry::new();
        let err = registry
            .register_named("cleanText", marker("a", Flow::Continue), false)
            .unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownStage("cleanText".to_string()));
        assert!(registry.is_empty());
    }

    #[test]
    fn register_named_rejects_mismatched_handler() {
        let mut registry = ExtensionRegistry::new();
        let err = registry
            .register_named("post_ranking", marker("a", Flow::Continue), false)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::StageMismatch {
                name: "post_ranking".to_string(),
                handler: Stage::CleanText,
            }
        );
    }

    #[test]
    fn defaults_set_and_unset() {
        let mut defaults = DefaultHandlers::none();
        assert!(!defaults.is_set(Stage::CleanText));
        defaults.set(marker("d", Flow::Continue));
        assert!(defaults.is_set(Stage::CleanText));
        defaults.unset(Stage::CleanText);
        assert!(!defaults.is_set(Stage::CleanText));
    }

    #[test]
    fn closure_builders_and_factories_bind_their_stages() {
        let builder = Handler::build_graph_fn(
            |features: &[String], sink: &mut dyn EdgeSink, _ctx: &StageContext<'_>| {
                for pair in features.windows(2) {
                    sink.add_connection(&pair[0], &pair[1]);
                }
                Ok(Flow::Continue)
            },
        );
        let factory = Handler::ranking_class_fn(
            |slot: &mut Option<Box<dyn RankingAlgorithm>>, _ctx: &StageContext<'_>| {
                *slot = Some(Box::new(PageRank::default()));
                Ok(Flow::Stop)
            },
        );
        assert_eq!(builder.stage(), Stage::BuildGraph);
        assert_eq!(factory.stage(), Stage::RankingClass);

        let mut registry = ExtensionRegistry::new();
        registry.register(builder, false);
        registry.register(factory, false);
        let ctx = StageContext::default();

        let mut slot: Option<Box<dyn RankingAlgorithm>> = None;
        invoke(Stage::RankingClass, &registry.ranking_class, None, true, |h| {
            h.create(&mut slot, &ctx)
        })
        .unwrap();
        assert_eq!(slot.map(|algorithm| algorithm.node_count()), Some(0));

        let features = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut graph = PageRank::default();
        invoke(Stage::BuildGraph, &registry.build_graph, None, true, |h| {
            h.build(&features, &mut graph, &ctx)
        })
        .unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.node_count(), 3);
    }

    #[test]
    fn cloned_registry_is_independent() {
        let mut original = ExtensionRegistry::new();
        original.register(marker("a", Flow::Continue), false);
        let mut copy = original.clone();
        copy.register(marker("b", Flow::Continue), false);

        assert_eq!(original.handler_count(Stage::CleanText), 1);
        assert_eq!(copy.handler_count(Stage::CleanText), 2);
    }
}
