//! Keyword extraction pipeline.
//!
//! `KeywordExtractor` drives one text through the fixed stage sequence:
//!
//! ```text
//! new_text → clean_text → get_features → filter_features → (compact)
//!          → ranking_class → build_graph → calculate → post_ranking
//! ```
//!
//! Each stage runs the registry's handlers first, then the extractor's own
//! default. Graph and scores live only for the duration of one call.

use crate::config::ExtractorConfig;
use crate::error::{ConfigurationError, ShapeError, TermRankResult};
use crate::extension::{invoke, DefaultHandlers, ExtensionRegistry, Handler, Stage, StageContext};
use crate::graph::{EdgeSink, WindowGraphBuilder};
use crate::ranking::{RankedList, RankingAlgorithm};
use crate::stages::{AlphabetCleaner, PageRankFactory, SpaceTokenizer, StopwordFilter};
use crate::stopwords::StopwordStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Extracts ranked keywords from text.
///
/// The registry is shared through `Arc`; [`registry_mut`] clones it on
/// write when other extractors still hold it. Text-derived state from the
/// last successful call is kept for inspection and left untouched when a
/// call fails.
///
/// [`registry_mut`]: KeywordExtractor::registry_mut
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    config: ExtractorConfig,
    registry: Arc<ExtensionRegistry>,
    defaults: DefaultHandlers,
    stopwords: Arc<StopwordStore>,
    raw_text: String,
    text: String,
    features: Vec<String>,
    lang: Option<String>,
}

impl KeywordExtractor {
    /// Extractor with default configuration and the keyword defaults bound.
    pub fn new() -> TermRankResult<Self> {
        Self::with_config(ExtractorConfig::default())
    }

    /// Extractor with the keyword defaults bound: a-z cleaner, space
    /// tokenizer, stopword filter, windowed co-occurrence graph and PageRank.
    pub fn with_config(config: ExtractorConfig) -> TermRankResult<Self> {
        let mut extractor = Self::bare(config)?;
        let stopword_filter = StopwordFilter::new(extractor.stopwords.clone());
        extractor.defaults = extractor
            .defaults
            .with(Handler::clean_text(AlphabetCleaner::new()?))
            .with(Handler::get_features(SpaceTokenizer))
            .with(Handler::filter_features(stopword_filter))
            .with(Handler::build_graph(WindowGraphBuilder::new(
                extractor.config.window,
            )?));
        Ok(extractor)
    }

    /// Extractor whose only default is the PageRank factory.
    ///
    /// `get_features` and `build_graph` must come from the registry.
    pub fn bare(config: ExtractorConfig) -> TermRankResult<Self> {
        config.validate()?;
        let ranking = config.ranking()?;
        let stopwords = Arc::new(StopwordStore::new(config.stopwords_dir()));
        Ok(Self {
            config,
            registry: Arc::new(ExtensionRegistry::new()),
            defaults: DefaultHandlers::none()
                .with(Handler::ranking_class(PageRankFactory::new(ranking))),
            stopwords,
            raw_text: String::new(),
            text: String::new(),
            features: Vec::new(),
            lang: None,
        })
    }

    /// Share an existing registry.
    pub fn with_registry(mut self, registry: Arc<ExtensionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Share a stopword cache with other extractors.
    ///
    /// Rebinds the default stopword filter to the given store.
    pub fn with_stopwords(mut self, stopwords: Arc<StopwordStore>) -> Self {
        if self.defaults.is_set(Stage::FilterFeatures) {
            self.defaults
                .set(Handler::filter_features(StopwordFilter::new(stopwords.clone())));
        }
        self.stopwords = stopwords;
        self
    }

    // --- Extension ---

    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    /// Mutable registry access, cloning it first if it is shared.
    pub fn registry_mut(&mut self) -> &mut ExtensionRegistry {
        Arc::make_mut(&mut self.registry)
    }

    /// Register a handler for its stage.
    pub fn register(&mut self, handler: Handler, replace: bool) -> &mut Self {
        self.registry_mut().register(handler, replace);
        self
    }

    /// Register under an exact extension-point name.
    pub fn register_named(
        &mut self,
        name: &str,
        handler: Handler,
        replace: bool,
    ) -> Result<&mut Self, ConfigurationError> {
        self.registry_mut().register_named(name, handler, replace)?;
        Ok(self)
    }

    /// The instance-level defaults, run after registered handlers.
    pub fn defaults_mut(&mut self) -> &mut DefaultHandlers {
        &mut self.defaults
    }

    // --- Extraction ---

    /// Rank the keywords of `text`.
    ///
    /// `lang` selects the stopword list; without it the configured language
    /// is used, if any. Fails without side effects when a required stage is
    /// unbound, when `get_features` leaves no sequence, when no ranking
    /// algorithm was selected, or when a handler fails.
    pub fn add_text(&mut self, text: &str, lang: Option<&str>) -> TermRankResult<RankedList> {
        let lang = lang.map(str::to_string).or_else(|| self.config.language.clone());
        let ctx = StageContext::new(lang.as_deref());
        let registry = &*self.registry;
        let defaults = &self.defaults;

        let mut raw_text = text.to_string();
        invoke(
            Stage::NewText,
            &registry.new_text,
            defaults.new_text.as_ref(),
            Stage::NewText.is_required(),
            |h| h.on_new_text(&mut raw_text, &ctx),
        )?;

        let mut text = raw_text.clone();
        invoke(
            Stage::CleanText,
            &registry.clean_text,
            defaults.clean_text.as_ref(),
            Stage::CleanText.is_required(),
            |h| h.clean(&mut text, &ctx),
        )?;

        let mut slot = None;
        invoke(
            Stage::GetFeatures,
            &registry.get_features,
            defaults.get_features.as_ref(),
            Stage::GetFeatures.is_required(),
            |h| h.tokenize(&text, &mut slot, &ctx),
        )?;
        let mut sequence = slot.ok_or(ShapeError::NoFeatures(Stage::GetFeatures))?;
        debug!(features = sequence.len(), "text tokenized");

        invoke(
            Stage::FilterFeatures,
            &registry.filter_features,
            defaults.filter_features.as_ref(),
            Stage::FilterFeatures.is_required(),
            |h| h.filter(&mut sequence, &ctx),
        )?;
        let features = sequence.compact();
        debug!(features = features.len(), "features filtered");

        let mut slot: Option<Box<dyn RankingAlgorithm>> = None;
        invoke(
            Stage::RankingClass,
            &registry.ranking_class,
            defaults.ranking_class.as_ref(),
            Stage::RankingClass.is_required(),
            |h| h.create(&mut slot, &ctx),
        )?;
        let mut algorithm = slot.ok_or(ConfigurationError::NoRankingAlgorithm)?;

        {
            let mut sink = AlgorithmSink(&mut *algorithm);
            invoke(
                Stage::BuildGraph,
                &registry.build_graph,
                defaults.build_graph.as_ref(),
                Stage::BuildGraph.is_required(),
                |h| h.build(&features, &mut sink, &ctx),
            )?;
        }
        debug!(
            nodes = algorithm.node_count(),
            edges = algorithm.edge_count(),
            "graph ready for ranking"
        );

        let mut ranked = algorithm.calculate()?;
        if !ranked.convergence().is_converged() {
            warn!(
                iterations = ranked.convergence().iterations(),
                "returning scores from a ranking that did not converge"
            );
        }

        invoke(
            Stage::PostRanking,
            &registry.post_ranking,
            defaults.post_ranking.as_ref(),
            Stage::PostRanking.is_required(),
            |h| h.process(&mut ranked, &ctx),
        )?;
        debug!(keywords = ranked.len(), lang = ?ctx.lang(), "text ranked");

        self.raw_text = raw_text;
        self.text = text;
        self.features = features;
        self.lang = lang;
        Ok(ranked)
    }

    // --- State ---

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn stopwords(&self) -> &Arc<StopwordStore> {
        &self.stopwords
    }

    /// Input of the last successful call, after `new_text`.
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Cleaned working copy of the last successful call.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Compacted features of the last successful call.
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }
}

/// Feeds builder edges into a boxed ranking algorithm.
struct AlgorithmSink<'a>(&'a mut dyn RankingAlgorithm);

impl EdgeSink for AlgorithmSink<'_> {
    fn add_connection(&mut self, source: &str, dest: &str) -> bool {
        self.0.add_connection(source, dest)
    }
}
