use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use roxmltree::{Document, Node, ParsingOptions};
use serde::{Deserialize, Serialize};

use crate::region::{NormalizeRules, RegionCode};

/// Minimum distinct regions a document must yield to be accepted.
pub const DEFAULT_MIN_REGIONS: usize = 20;

/// Upstream canton maps, tried in order.
pub const DEFAULT_MAP_SOURCES: &[&str] = &[
    "https://upload.wikimedia.org/wikipedia/commons/f/f8/Suisse_cantons.svg",
    "https://upload.wikimedia.org/wikipedia/commons/2/24/Switzerland_location_map_cantons.svg",
];

const CONTAINER_TAG: &str = "g";
const PRIMITIVE_TAGS: [&str; 3] = ["path", "polygon", "rect"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub rules: NormalizeRules,
    pub min_regions: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            rules: NormalizeRules::default(),
            min_regions: DEFAULT_MIN_REGIONS,
        }
    }
}

/// Logical coordinate system declared by the source document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBox {
    pub fn parse(value: &str) -> Option<Self> {
        let numbers: Vec<f64> = value
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        let &[min_x, min_y, width, height] = numbers.as_slice() else {
            return None;
        };
        if width <= 0.0 || height <= 0.0 {
            return None;
        }
        Some(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }

    pub fn to_attr(&self) -> String {
        format!("{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

/// Geometry attributes kept from a source primitive. Presentation attributes are never copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Path {
        d: String,
    },
    Polygon {
        points: String,
    },
    Rect {
        x: Option<String>,
        y: Option<String>,
        width: String,
        height: String,
        rx: Option<String>,
        ry: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub geometry: Geometry,
    /// Ancestor transforms (outermost first) followed by the primitive's own.
    pub transform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRegion {
    pub code: RegionCode,
    pub shapes: Vec<Shape>,
}

/// Shapes recovered from one document, before acceptance.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedMap {
    pub view_box: Option<ViewBox>,
    pub regions: Vec<CanonicalRegion>,
    /// Primitives picked up through identified containers.
    pub container_shapes: usize,
    /// Primitives picked up through their own identifier.
    pub bare_shapes: usize,
}

/// An accepted map document.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedMap {
    pub source: String,
    pub view_box: Option<ViewBox>,
    /// Sorted by code.
    pub regions: Vec<CanonicalRegion>,
    /// Sources tried and rejected before this one.
    pub skipped: Vec<SourceAttempt>,
}

impl IngestedMap {
    pub fn codes(&self) -> impl Iterator<Item = &RegionCode> {
        self.regions.iter().map(|region| &region.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFailure {
    Fetch(String),
    Status(u16),
    Parse(String),
    TooFewRegions { found: usize, required: usize },
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(message) => write!(f, "fetch error: {message}"),
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Parse(message) => write!(f, "parse error: {message}"),
            Self::TooFewRegions { found, required } => {
                write!(f, "recognized {found} regions, need at least {required}")
            }
        }
    }
}

impl std::error::Error for SourceFailure {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAttempt {
    pub source: String,
    pub failure: SourceFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    NoSources,
    Exhausted(Vec<SourceAttempt>),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSources => f.write_str("Map unavailable: no map sources configured"),
            Self::Exhausted(attempts) => write!(
                f,
                "Map unavailable: none of {} sources produced a usable map",
                attempts.len()
            ),
        }
    }
}

impl std::error::Error for IngestError {}

/// Retrieves a map document as text. Non-success responses map to [`SourceFailure::Status`].
pub trait DocumentFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, SourceFailure>>;
}

/// Try each source in order and return the first one that yields enough regions.
pub async fn ingest<F, S>(
    fetcher: &F,
    sources: &[S],
    config: &IngestConfig,
) -> Result<IngestedMap, IngestError>
where
    F: DocumentFetcher,
    S: AsRef<str>,
{
    if sources.is_empty() {
        return Err(IngestError::NoSources);
    }

    let mut skipped = Vec::new();
    for source in sources {
        let source = source.as_ref();
        let outcome = match fetcher.fetch(source).await {
            Ok(text) => accept_document(&text, config),
            Err(failure) => Err(failure),
        };
        match outcome {
            Ok(extracted) => {
                return Ok(IngestedMap {
                    source: source.to_string(),
                    view_box: extracted.view_box,
                    regions: extracted.regions,
                    skipped,
                });
            }
            Err(failure) => skipped.push(SourceAttempt {
                source: source.to_string(),
                failure,
            }),
        }
    }

    Err(IngestError::Exhausted(skipped))
}

/// Extract regions and apply the acceptance threshold.
pub fn accept_document(text: &str, config: &IngestConfig) -> Result<ExtractedMap, SourceFailure> {
    let extracted = extract_regions(text, &config.rules)?;
    if extracted.regions.len() < config.min_regions {
        return Err(SourceFailure::TooFewRegions {
            found: extracted.regions.len(),
            required: config.min_regions,
        });
    }
    Ok(extracted)
}

/// Parse an SVG document and group its identified shapes by canonical code.
pub fn extract_regions(text: &str, rules: &NormalizeRules) -> Result<ExtractedMap, SourceFailure> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(text, options)
        .map_err(|e| SourceFailure::Parse(e.to_string()))?;

    let view_box = doc
        .root_element()
        .attribute("viewBox")
        .and_then(ViewBox::parse);

    let mut grouped: BTreeMap<RegionCode, Vec<Shape>> = BTreeMap::new();
    let mut container_shapes = 0;
    let mut bare_shapes = 0;

    // Containers that carry an identifier.
    for container in doc.descendants().filter(|n| is_container(*n)) {
        let Some(code) = own_code(container, rules) else {
            continue;
        };
        for primitive in container.descendants().filter(|n| is_primitive(*n)) {
            if own_code(primitive, rules).is_some() {
                continue;
            }
            let owned_here = owning_container(primitive, rules)
                .is_some_and(|(owner, _)| owner == container);
            if !owned_here {
                continue;
            }
            if let Some(shape) = copy_shape(primitive) {
                grouped.entry(code.clone()).or_default().push(shape);
                container_shapes += 1;
            }
        }
    }

    // Primitives with their own recognized identifier, wherever they sit.
    for primitive in doc.descendants().filter(|n| is_primitive(*n)) {
        let Some(code) = own_code(primitive, rules) else {
            continue;
        };
        if let Some(shape) = copy_shape(primitive) {
            grouped.entry(code).or_default().push(shape);
            bare_shapes += 1;
        }
    }

    let regions = grouped
        .into_iter()
        .map(|(code, shapes)| CanonicalRegion { code, shapes })
        .collect();

    Ok(ExtractedMap {
        view_box,
        regions,
        container_shapes,
        bare_shapes,
    })
}

fn is_container(node: Node<'_, '_>) -> bool {
    node.is_element() && node.tag_name().name() == CONTAINER_TAG
}

fn is_primitive(node: Node<'_, '_>) -> bool {
    node.is_element() && PRIMITIVE_TAGS.contains(&node.tag_name().name())
}

fn own_code(node: Node<'_, '_>, rules: &NormalizeRules) -> Option<RegionCode> {
    node.attribute("id").and_then(|id| rules.normalize(id))
}

/// Nearest ancestor container whose identifier normalizes.
fn owning_container<'a, 'input>(
    node: Node<'a, 'input>,
    rules: &NormalizeRules,
) -> Option<(Node<'a, 'input>, RegionCode)> {
    node.ancestors().skip(1).filter(|n| is_container(*n)).find_map(|ancestor| {
        own_code(ancestor, rules).map(|code| (ancestor, code))
    })
}

fn copy_shape(node: Node<'_, '_>) -> Option<Shape> {
    let owned = |name: &str| node.attribute(name).map(str::to_string);
    let geometry = match node.tag_name().name() {
        "path" => Geometry::Path { d: owned("d")? },
        "polygon" => Geometry::Polygon {
            points: owned("points")?,
        },
        "rect" => Geometry::Rect {
            x: owned("x"),
            y: owned("y"),
            width: owned("width")?,
            height: owned("height")?,
            rx: owned("rx"),
            ry: owned("ry"),
        },
        _ => return None,
    };
    Some(Shape {
        geometry,
        transform: composed_transform(node),
    })
}

fn composed_transform(node: Node<'_, '_>) -> Option<String> {
    let mut parts: Vec<&str> = node
        .ancestors()
        .filter(|n| n.is_element())
        .filter_map(|n| n.attribute("transform"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    parts.reverse();
    Some(parts.join(" "))
}
