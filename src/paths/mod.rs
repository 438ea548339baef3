use std::collections::{HashMap, HashSet};

use log::{debug, error, trace, warn};
use serde::{Deserialize, Serialize};

use crate::assets::AssetLoader;
use crate::{RenderError, RenderResult};

pub mod parser;
pub mod templates;

pub use parser::PathToken;

// Path template
//------------------------------------------------------------------------------

/// A relative path authored in a `size`-unit square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathTemplate {
    pub path: String,
    pub size: f64,
}

impl PathTemplate {
    pub fn new(path: impl Into<String>, size: f64) -> Self {
        Self { path: path.into(), size }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathSet {
    Dot,
    CornerSquare,
    CornerDot,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub parses: usize,
    pub loads: usize,
}

// Path compiler
//------------------------------------------------------------------------------

/// Compiles the families of one path set and memoizes the results.
///
/// A family is parsed once into size-independent tokens, then rendered once per
/// requested size. Both caches only ever grow.
#[derive(Debug, Clone)]
pub struct PathCompiler {
    set: PathSet,
    templates: HashMap<String, PathTemplate>,
    lazy: HashSet<String>,
    relative: HashMap<String, Vec<PathToken>>,
    scaled: HashMap<(String, u64), String>,
    malformed: HashSet<String>,
    stats: CacheStats,
}

impl PathCompiler {
    pub fn new(set: PathSet) -> Self {
        Self {
            set,
            templates: HashMap::new(),
            lazy: HashSet::new(),
            relative: HashMap::new(),
            scaled: HashMap::new(),
            malformed: HashSet::new(),
            stats: CacheStats::default(),
        }
    }

    pub fn with_templates(mut self, templates: impl IntoIterator<Item = (String, PathTemplate)>) -> Self {
        self.templates.extend(templates);
        self
    }

    /// Declares families whose template is fetched through an [`AssetLoader`] on first use.
    pub fn with_lazy<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.lazy.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn set(&self) -> PathSet {
        self.set
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn is_resolved(&self, family: &str) -> bool {
        self.templates.contains_key(family)
    }

    pub fn is_lazy(&self, family: &str) -> bool {
        self.lazy.contains(family)
    }

    /// Registers a template directly, replacing nothing that is already resolved.
    pub fn insert(&mut self, family: impl Into<String>, template: PathTemplate) {
        self.templates.entry(family.into()).or_insert(template);
    }

    /// Resolves a lazy family. Families that are not lazy, or already resolved, are left untouched.
    pub async fn load<L: AssetLoader + ?Sized>(&mut self, family: &str, loader: &L) -> RenderResult<()> {
        if !self.lazy.contains(family) || self.templates.contains_key(family) {
            return Ok(());
        }

        self.stats.loads += 1;
        let template = loader.load_template(family).await?;
        debug!("Loaded {:?} family {family} ({} units)", self.set, template.size);
        self.templates.insert(family.to_string(), template);
        Ok(())
    }

    /// Size-scaled command string for a family, without the anchoring move.
    pub fn scaled(&mut self, family: &str, size: f64) -> RenderResult<&str> {
        let key = (family.to_string(), size.to_bits());
        if self.scaled.contains_key(&key) {
            self.stats.hits += 1;
            return Ok(self.scaled[&key].as_str());
        }

        if !self.relative.contains_key(family) {
            let template = self
                .templates
                .get(family)
                .ok_or_else(|| RenderError::UnknownShapeFamily(family.to_string()))?;
            let tokens = parser::parse(&template.path, template.size).map_err(|reason| {
                RenderError::MalformedTemplate { family: family.to_string(), reason }
            })?;
            self.stats.parses += 1;
            self.relative.insert(family.to_string(), tokens);
        }

        self.stats.misses += 1;
        trace!("Scaling {:?} family {family} to {size}", self.set);
        let path = self.relative[family].iter().map(|t| t.scaled(size)).collect::<Vec<_>>().join(" ");
        Ok(self.scaled.entry(key).or_insert(path).as_str())
    }

    /// Absolute path for a family placed at `(x, y)` and scaled to `size`.
    pub fn try_build(&mut self, family: &str, size: f64, x: f64, y: f64) -> RenderResult<String> {
        let scaled = self.scaled(family, size)?;
        Ok(format!("m {x} {y} {scaled}"))
    }

    /// Like [`Self::try_build`], but an unknown, unloaded or malformed family yields an empty path.
    pub fn build(&mut self, family: &str, size: f64, x: f64, y: f64) -> String {
        match self.try_build(family, size, x, y) {
            Ok(path) => path,
            Err(RenderError::MalformedTemplate { family, reason }) => {
                if self.malformed.insert(family.clone()) {
                    error!("Malformed {:?} family {family}: {reason}", self.set);
                }
                String::new()
            }
            Err(err) => {
                warn!("Skipping {:?} shape: {err}", self.set);
                String::new()
            }
        }
    }
}

// Shape cache
//------------------------------------------------------------------------------

/// The three path sets a render draws from, preloaded with the bundled families.
#[derive(Debug, Clone)]
pub struct ShapeCache {
    dots: PathCompiler,
    corner_squares: PathCompiler,
    corner_dots: PathCompiler,
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapeCache {
    pub fn new() -> Self {
        Self {
            dots: PathCompiler::new(PathSet::Dot).with_templates(templates::dots()),
            corner_squares: PathCompiler::new(PathSet::CornerSquare)
                .with_templates(templates::corner_squares())
                .with_lazy(templates::corner_squares_lazy()),
            corner_dots: PathCompiler::new(PathSet::CornerDot)
                .with_templates(templates::corner_dots())
                .with_lazy(templates::corner_dots_lazy()),
        }
    }

    pub fn compiler(&self, set: PathSet) -> &PathCompiler {
        match set {
            PathSet::Dot => &self.dots,
            PathSet::CornerSquare => &self.corner_squares,
            PathSet::CornerDot => &self.corner_dots,
        }
    }

    pub fn compiler_mut(&mut self, set: PathSet) -> &mut PathCompiler {
        match set {
            PathSet::Dot => &mut self.dots,
            PathSet::CornerSquare => &mut self.corner_squares,
            PathSet::CornerDot => &mut self.corner_dots,
        }
    }

    pub fn build(&mut self, set: PathSet, family: &str, size: f64, x: f64, y: f64) -> String {
        self.compiler_mut(set).build(family, size, x, y)
    }

    /// Resolves a lazy family, logging instead of failing: a missing template only blanks its shapes.
    pub async fn load<L: AssetLoader + ?Sized>(&mut self, set: PathSet, family: &str, loader: &L) {
        if let Err(err) = self.compiler_mut(set).load(family, loader).await {
            warn!("Cannot load {set:?} family {family}: {err}");
        }
    }

    pub fn stats(&self) -> CacheStats {
        [&self.dots, &self.corner_squares, &self.corner_dots].iter().fold(CacheStats::default(), |acc, pc| {
            let s = pc.stats();
            CacheStats {
                hits: acc.hits + s.hits,
                misses: acc.misses + s.misses,
                parses: acc.parses + s.parses,
                loads: acc.loads + s.loads,
            }
        })
    }
}

#[cfg(test)]
mod shape_cache_tests {
    use super::{PathSet, ShapeCache};
    use crate::assets::BundledAssets;

    #[test]
    fn test_bundled_families() {
        let mut cache = ShapeCache::new();
        assert!(!cache.build(PathSet::Dot, "sparkle", 14.0, 0.0, 0.0).is_empty());
        assert!(!cache.build(PathSet::CornerSquare, "shape10", 70.0, 0.0, 0.0).is_empty());
        assert!(!cache.build(PathSet::CornerDot, "sun", 30.0, 0.0, 0.0).is_empty());
        assert!(cache.build(PathSet::Dot, "shape10", 14.0, 0.0, 0.0).is_empty());
    }

    #[test]
    fn test_lazy_corner_families() {
        let mut cache = ShapeCache::new();
        assert!(cache.compiler(PathSet::CornerSquare).is_lazy("shape11"));
        assert!(cache.build(PathSet::CornerSquare, "shape11", 70.0, 0.0, 0.0).is_empty());

        pollster::block_on(cache.load(PathSet::CornerSquare, "shape11", &BundledAssets));
        assert!(!cache.build(PathSet::CornerSquare, "shape11", 70.0, 0.0, 0.0).is_empty());
        assert_eq!(cache.stats().loads, 1);
    }

    #[test]
    fn test_ratio_between_sizes() {
        let mut cache = ShapeCache::new();
        let nums = |s: String| {
            s.split(' ').filter_map(|t| t.parse::<f64>().ok()).skip(2).collect::<Vec<_>>()
        };
        let small = nums(cache.build(PathSet::CornerDot, "heart", 10.0, 0.0, 0.0));
        let large = nums(cache.build(PathSet::CornerDot, "heart", 20.0, 0.0, 0.0));
        assert_eq!(small.len(), large.len());
        for (a, b) in small.iter().zip(&large) {
            assert!((b - 2.0 * a).abs() <= 0.002, "{b} is not twice {a}");
        }
    }
}
