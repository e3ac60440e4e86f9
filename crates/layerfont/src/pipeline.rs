//! The engine that drives a request through every stage to a document

use layerfont_core::{
    cache::{hash_key, CacheStats, DocumentCache},
    error::{LayerfontError, Result},
    request::normalize_stylistic_sets,
    traits::{Exporter, ResourceSource},
    types::{LayoutResult, RenderedDocument},
    LayoutRequest, RequestParams,
};
use layerfont_outline::{OutlineLoader, Subset};
use layerfont_render_svg::SvgSerializer;
use layerfont_shape::{
    compose, layout::required_styles, LayerTables, LayoutEngine, SubstitutionTable,
};
use std::sync::Arc;

/// Pipeline for one typeface: Resolve → Load → Lay out → Compose → Serialize
///
/// Outline tables are loaded once per style and orientation and shared by
/// every call. Finished documents are cached by request unless the request
/// asks for debug output or the cache is turned off.
///
/// ```ignore
/// use layerfont::prelude::*;
///
/// let pipeline = Pipeline::builder()
///     .source(Arc::new(DirectorySource::new("fonts")))
///     .substitutions(SubstitutionTable::new())
///     .build()?;
///
/// let document = pipeline.render(&LayoutRequest::default())?;
/// std::fs::write("hello.svg", &document.svg)?;
/// ```
pub struct Pipeline {
    loader: OutlineLoader,
    substitutions: Arc<SubstitutionTable>,
    engine: LayoutEngine,
    documents: Option<DocumentCache<Arc<CachedDocument>>>,
}

/// A cached document with the request that produced it; keys are only hashes
struct CachedDocument {
    request: LayoutRequest,
    document: Arc<RenderedDocument>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Pipeline over `source` with the document cache at its default size
    pub fn new(source: Arc<dyn ResourceSource>, substitutions: Arc<SubstitutionTable>) -> Self {
        Self::assemble(source, substitutions, Some(0))
    }

    /// `cache_capacity` of `None` turns the document cache off
    fn assemble(
        source: Arc<dyn ResourceSource>,
        substitutions: Arc<SubstitutionTable>,
        cache_capacity: Option<usize>,
    ) -> Self {
        log::debug!("Building pipeline over {} source", source.name());
        Self {
            loader: OutlineLoader::new(source),
            substitutions,
            engine: LayoutEngine::new(),
            documents: cache_capacity.map(DocumentCache::new),
        }
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }

    pub fn loader(&self) -> &OutlineLoader {
        &self.loader
    }

    /// Position every layer; missing data degrades instead of failing
    pub fn layout(&self, request: &LayoutRequest) -> LayoutResult {
        let (resolved, tables) = self.prepare(request);
        self.engine.layout(request, &resolved, &tables)
    }

    /// Produce the SVG document for a request
    ///
    /// Fails only when no layer could draw anything.
    pub fn render(&self, request: &LayoutRequest) -> Result<Arc<RenderedDocument>> {
        let cache = self.documents.as_ref().filter(|_| !request.debug);
        let key = hash_key(request);
        if let Some(cached) = cache.and_then(|cache| cache.get(key)) {
            if cached.request == *request {
                log::debug!("Document cache hit for {:?}", request.text);
                return Ok(Arc::clone(&cached.document));
            }
            log::debug!("Document cache key collision for {:?}; rendering", request.text);
        }

        let (resolved, tables) = self.prepare(request);
        let layout = self.engine.layout(request, &resolved, &tables);
        if layout.is_empty() {
            return Err(LayerfontError::EmptyRender);
        }

        let list = compose(&layout, &tables);
        let svg = SvgSerializer::new()
            .pretty(request.debug)
            .serialize(&list, Some(&request.text));
        let (width, height) = list.pixel_size();
        let document = Arc::new(RenderedDocument {
            svg,
            layout,
            width,
            height,
        });

        if let Some(cache) = cache {
            let cached = CachedDocument {
                request: request.clone(),
                document: Arc::clone(&document),
            };
            cache.insert(key, Arc::new(cached));
        }
        Ok(document)
    }

    /// Render and encode in one go
    pub fn export(&self, request: &LayoutRequest, exporter: &dyn Exporter) -> Result<Vec<u8>> {
        let document = self.render(request)?;
        log::debug!(
            "Exporting {}x{} document as {}",
            document.width,
            document.height,
            exporter.name()
        );
        exporter.export(&document)
    }

    /// Render straight from a raw `key=value&...` query
    pub fn render_query(&self, query: &str) -> Result<Arc<RenderedDocument>> {
        self.render(&RequestParams::parse_query(query).into_request())
    }

    /// Outline-table and document cache counters
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        let documents = self.documents.as_ref().map(DocumentCache::stats).unwrap_or_default();
        (self.loader.stats(), documents)
    }

    pub fn clear_caches(&self) {
        self.loader.clear();
        if let Some(cache) = &self.documents {
            cache.clear();
        }
    }

    /// Substituted text plus the per-style tables it needs
    ///
    /// Sets are normalized again here since requests can be built field by field.
    fn prepare(&self, request: &LayoutRequest) -> (Vec<char>, LayerTables) {
        let sets = normalize_stylistic_sets(
            request.stylistic_sets.iter().map(String::as_str),
            request.orientation,
        );
        let resolved = self.substitutions.resolve_text(&request.chars(), &sets);
        let subset = Subset::for_request(&resolved, &request.decoration);
        let tables = required_styles(request)
            .into_iter()
            .map(|style| (style, self.loader.load(style, request.orientation, &subset)))
            .collect();
        (resolved, tables)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("loader", &self.loader)
            .field("sets", &self.substitutions.set_ids().collect::<Vec<_>>())
            .field("document_cache", &self.documents.is_some())
            .finish()
    }
}

/// Build pipelines piece by piece
///
/// An outline source is required; substitutions default to the
/// process-wide table and the document cache is on.
pub struct PipelineBuilder {
    source: Option<Arc<dyn ResourceSource>>,
    substitutions: Option<Arc<SubstitutionTable>>,
    document_cache: bool,
    cache_capacity: usize,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            substitutions: None,
            document_cache: true,
            cache_capacity: 0,
        }
    }

    /// Where the outline tables come from
    pub fn source(mut self, source: Arc<dyn ResourceSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn substitutions(mut self, table: SubstitutionTable) -> Self {
        self.substitutions = Some(Arc::new(table));
        self
    }

    pub fn shared_substitutions(mut self, table: Arc<SubstitutionTable>) -> Self {
        self.substitutions = Some(table);
        self
    }

    pub fn document_cache(mut self, enabled: bool) -> Self {
        self.document_cache = enabled;
        self
    }

    /// Maximum cached documents; 0 keeps the default
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let source = self
            .source
            .clone()
            .ok_or_else(|| LayerfontError::Config("No outline source configured".into()))?;
        let substitutions = self
            .substitutions
            .clone()
            .unwrap_or_else(SubstitutionTable::global);
        Ok(self.build_with(source, substitutions))
    }

    /// Build with an explicit source and table, ignoring those set earlier
    pub fn build_with(
        self,
        source: Arc<dyn ResourceSource>,
        substitutions: Arc<SubstitutionTable>,
    ) -> Pipeline {
        let capacity = self.document_cache.then_some(self.cache_capacity);
        Pipeline::assemble(source, substitutions, capacity)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfont_core::{LayerSpec, LayerStyle, Orientation};
    use layerfont_outline::MemorySource;

    const FONT: &str = r#"<svg><defs><font horiz-adv-x="500">
<font-face units-per-em="1000" ascent="800" descent="-200"/>
<missing-glyph horiz-adv-x="500" d="M0 0h500v700h-500z"/>
<glyph unicode="A" horiz-adv-x="600" d="M0 0l300 700l300 -700z"/>
<glyph unicode="B" horiz-adv-x="500" d="M0 0v700h500v-700z"/>
</font></defs></svg>"#;

    fn pipeline() -> Pipeline {
        let source = MemorySource::new().with(LayerStyle::Regular, Orientation::Horizontal, FONT);
        Pipeline::new(Arc::new(source), Arc::new(SubstitutionTable::new()))
    }

    fn request(text: &str) -> LayoutRequest {
        LayoutRequest {
            text: text.to_string(),
            layers: vec![LayerSpec {
                style: LayerStyle::Regular,
                color: LayerStyle::Regular.default_color(),
            }],
            ..LayoutRequest::default()
        }
    }

    #[test]
    fn test_colliding_cache_key_is_not_served() {
        let pipeline = pipeline();
        let other = pipeline.render(&request("B")).unwrap();
        let wanted = request("A");

        // Park the other request's document under the wanted request's key
        let cache = pipeline.documents.as_ref().unwrap();
        let stale = CachedDocument {
            request: request("B"),
            document: Arc::clone(&other),
        };
        cache.insert(hash_key(&wanted), Arc::new(stale));

        let document = pipeline.render(&wanted).unwrap();
        assert!(!Arc::ptr_eq(&document, &other));
        assert!(document.svg.contains("<!-- A -->"));

        // The fresh document replaced the colliding entry
        let again = pipeline.render(&wanted).unwrap();
        assert!(Arc::ptr_eq(&document, &again));
    }
}
