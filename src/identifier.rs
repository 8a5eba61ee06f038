//! Identifier types accepted by the Altmetric API
//!
//! Every request targets exactly one scholarly object, addressed by one of six
//! identifier kinds. [`Identifier`] pairs the kind with its value and renders
//! the `<kind>/<value>` path the API expects. [`IdentifierQuery`] offers the
//! named-slot style of input (one optional field per kind) and funnels it into
//! a single [`Identifier`].

use crate::error::{AltmetricError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The kind of external reference used to look up an object
///
/// # Examples
///
/// ```
/// use altmetric_client::IdentifierKind;
///
/// let kind: IdentifierKind = "arXiv".parse().unwrap();
/// assert_eq!(kind, IdentifierKind::Arxiv);
/// assert_eq!(kind.as_str(), "arxiv");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierKind {
    /// Altmetric's own numeric identifier
    Id,
    /// Digital Object Identifier
    Doi,
    /// PubMed ID
    Pmid,
    /// arXiv identifier
    Arxiv,
    /// ISBN
    Isbn,
    /// Arbitrary URI
    Uri,
}

impl IdentifierKind {
    /// All kinds the API accepts
    pub const ALL: [IdentifierKind; 6] = [
        IdentifierKind::Id,
        IdentifierKind::Doi,
        IdentifierKind::Pmid,
        IdentifierKind::Arxiv,
        IdentifierKind::Isbn,
        IdentifierKind::Uri,
    ];

    /// Lowercase tag used in request paths
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Id => "id",
            IdentifierKind::Doi => "doi",
            IdentifierKind::Pmid => "pmid",
            IdentifierKind::Arxiv => "arxiv",
            IdentifierKind::Isbn => "isbn",
            IdentifierKind::Uri => "uri",
        }
    }

    /// Look up a kind by its tag, ignoring ASCII case
    ///
    /// # Errors
    ///
    /// Returns `AltmetricError::UnknownIdentifierType` if the tag is not one
    /// of `id`, `doi`, `pmid`, `arxiv`, `isbn` or `uri`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| AltmetricError::UnknownIdentifierType {
                tag: tag.to_string(),
            })
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdentifierKind {
    type Err = AltmetricError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

/// Canonicalize a raw identifier into the `<kind>/<value>` form
///
/// A leading `<kind>:` tag (any case) is stripped before re-tagging, so
/// `doi:10.1038/x` and `10.1038/x` both become `doi/10.1038/x`. The tag is
/// only recognized at the very start of the value, before the first colon;
/// anything else is prefixed as-is. Surrounding whitespace is trimmed.
///
/// # Errors
///
/// Returns `AltmetricError::EmptyIdentifier` if nothing remains after
/// trimming and tag removal.
///
/// # Examples
///
/// ```
/// use altmetric_client::{normalize_identifier, IdentifierKind};
///
/// assert_eq!(
///     normalize_identifier("doi:10.1038/480426a", IdentifierKind::Doi).unwrap(),
///     "doi/10.1038/480426a"
/// );
/// assert_eq!(
///     normalize_identifier("arXiv:1108.2455", IdentifierKind::Arxiv).unwrap(),
///     "arxiv/1108.2455"
/// );
/// assert_eq!(
///     normalize_identifier("21761193", IdentifierKind::Pmid).unwrap(),
///     "pmid/21761193"
/// );
/// assert!(normalize_identifier("  ", IdentifierKind::Isbn).is_err());
/// ```
pub fn normalize_identifier(raw: &str, kind: IdentifierKind) -> Result<String> {
    let trimmed = raw.trim();
    let value = strip_leading_tag(trimmed, kind).unwrap_or(trimmed);

    if value.is_empty() {
        return Err(AltmetricError::EmptyIdentifier { kind });
    }

    Ok(format!("{}/{}", kind.as_str(), value))
}

fn strip_leading_tag(raw: &str, kind: IdentifierKind) -> Option<&str> {
    let (head, rest) = raw.split_once(':')?;
    if head.trim().eq_ignore_ascii_case(kind.as_str()) {
        Some(rest.trim_start())
    } else {
        None
    }
}

/// A single, validated identifier for an Altmetric lookup
///
/// # Examples
///
/// ```
/// use altmetric_client::{Identifier, IdentifierKind};
///
/// let id = Identifier::doi("doi:10.1038/480426a").unwrap();
/// assert_eq!(id.kind(), IdentifierKind::Doi);
/// assert_eq!(id.value(), "10.1038/480426a");
/// assert_eq!(id.path(), "doi/10.1038/480426a");
///
/// // Already-tagged paths parse directly
/// let id: Identifier = "isbn/978-3-319-25557-6".parse().unwrap();
/// assert_eq!(id.kind(), IdentifierKind::Isbn);
///
/// // Unknown tags are rejected
/// assert!("pmc/PMC3159876".parse::<Identifier>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    kind: IdentifierKind,
    value: String,
}

impl Identifier {
    /// Build an identifier from a raw value of a known kind
    ///
    /// The value is normalized with [`normalize_identifier`] and the kind is
    /// re-derived from the normalized path.
    pub fn new(kind: IdentifierKind, raw: &str) -> Result<Self> {
        let normalized = normalize_identifier(raw, kind)?;
        Self::from_path(&normalized)
    }

    /// Altmetric numeric identifier
    pub fn id(raw: &str) -> Result<Self> {
        Self::new(IdentifierKind::Id, raw)
    }

    /// Digital Object Identifier
    pub fn doi(raw: &str) -> Result<Self> {
        Self::new(IdentifierKind::Doi, raw)
    }

    /// PubMed ID
    pub fn pmid(raw: &str) -> Result<Self> {
        Self::new(IdentifierKind::Pmid, raw)
    }

    /// arXiv identifier
    pub fn arxiv(raw: &str) -> Result<Self> {
        Self::new(IdentifierKind::Arxiv, raw)
    }

    /// ISBN
    pub fn isbn(raw: &str) -> Result<Self> {
        Self::new(IdentifierKind::Isbn, raw)
    }

    /// URI
    pub fn uri(raw: &str) -> Result<Self> {
        Self::new(IdentifierKind::Uri, raw)
    }

    /// Parse an already-tagged `<kind>/<value>` path
    ///
    /// # Errors
    ///
    /// * `AltmetricError::UnknownIdentifierType` - the tag before the first `/`
    ///   is not a supported kind (or there is no `/` at all)
    /// * `AltmetricError::EmptyIdentifier` - nothing follows the tag
    pub fn from_path(path: &str) -> Result<Self> {
        let path = path.trim();
        let (tag, value) =
            path.split_once('/')
                .ok_or_else(|| AltmetricError::UnknownIdentifierType {
                    tag: path.to_string(),
                })?;

        let kind = IdentifierKind::from_tag(tag)?;
        let value = value.trim();
        if value.is_empty() {
            return Err(AltmetricError::EmptyIdentifier { kind });
        }

        Ok(Self {
            kind,
            value: value.to_string(),
        })
    }

    /// The identifier kind
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    /// The value without its kind tag
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The `<kind>/<value>` request path
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind.as_str(), self.value)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.value)
    }
}

impl FromStr for Identifier {
    type Err = AltmetricError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_path(s)
    }
}

impl TryFrom<String> for Identifier {
    type Error = AltmetricError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_path(&value)
    }
}

impl From<Identifier> for String {
    fn from(identifier: Identifier) -> Self {
        identifier.path()
    }
}

/// Named identifier slots, at most one of which may be filled
///
/// Mirrors the "one keyword argument per identifier kind" calling style.
/// [`IdentifierQuery::select`] enforces that exactly one slot is used.
///
/// # Examples
///
/// ```
/// use altmetric_client::{IdentifierKind, IdentifierQuery};
///
/// let id = IdentifierQuery::new().doi("10.1038/480426a").select().unwrap();
/// assert_eq!(id.kind(), IdentifierKind::Doi);
///
/// assert!(IdentifierQuery::new().select().is_err());
/// assert!(
///     IdentifierQuery::new()
///         .doi("10.1038/480426a")
///         .pmid("21761193")
///         .select()
///         .is_err()
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierQuery {
    oid: Option<String>,
    id: Option<String>,
    doi: Option<String>,
    pmid: Option<String>,
    arxiv: Option<String>,
    isbn: Option<String>,
    uri: Option<String>,
}

impl IdentifierQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// An already-tagged object path such as `doi/10.1038/480426a`
    ///
    /// The value is not re-tagged; its own tag is validated when it is
    /// selected. A value without any `/` is taken as an Altmetric id.
    pub fn oid<S: Into<String>>(mut self, value: S) -> Self {
        self.oid = Some(value.into());
        self
    }

    pub fn id<S: Into<String>>(mut self, value: S) -> Self {
        self.id = Some(value.into());
        self
    }

    pub fn doi<S: Into<String>>(mut self, value: S) -> Self {
        self.doi = Some(value.into());
        self
    }

    pub fn pmid<S: Into<String>>(mut self, value: S) -> Self {
        self.pmid = Some(value.into());
        self
    }

    pub fn arxiv<S: Into<String>>(mut self, value: S) -> Self {
        self.arxiv = Some(value.into());
        self
    }

    pub fn isbn<S: Into<String>>(mut self, value: S) -> Self {
        self.isbn = Some(value.into());
        self
    }

    pub fn uri<S: Into<String>>(mut self, value: S) -> Self {
        self.uri = Some(value.into());
        self
    }

    fn slots(&self) -> [(IdentifierKind, Option<&str>); 6] {
        [
            (IdentifierKind::Id, self.id.as_deref()),
            (IdentifierKind::Doi, self.doi.as_deref()),
            (IdentifierKind::Pmid, self.pmid.as_deref()),
            (IdentifierKind::Arxiv, self.arxiv.as_deref()),
            (IdentifierKind::Isbn, self.isbn.as_deref()),
            (IdentifierKind::Uri, self.uri.as_deref()),
        ]
    }

    fn object_path(&self) -> Option<String> {
        let oid = self.oid.as_deref()?.trim();
        if oid.is_empty() || oid.contains('/') {
            Some(oid.to_string())
        } else {
            Some(format!("{}/{}", IdentifierKind::Id.as_str(), oid))
        }
    }

    /// Resolve the slots into the single identifier to query
    ///
    /// Each filled typed slot is normalized with its own kind, the `oid` path
    /// is taken as given, absent or blank candidates are dropped, and exactly
    /// one must remain. The kind of the survivor is re-derived from its path
    /// and checked against the supported kinds.
    ///
    /// # Errors
    ///
    /// * `AltmetricError::EmptyIdentifier` - a typed slot holds only whitespace
    /// * `AltmetricError::NoIdentifier` - no slot is filled
    /// * `AltmetricError::MultipleIdentifiers` - more than one slot is filled
    /// * `AltmetricError::UnknownIdentifierType` - the selected path carries an
    ///   unsupported tag
    pub fn select(&self) -> Result<Identifier> {
        let mut normalized = vec![self.object_path()];
        for (kind, raw) in self.slots() {
            normalized.push(raw.map(|r| normalize_identifier(r, kind)).transpose()?);
        }

        let mut candidates = compact(normalized);
        debug!(candidates = candidates.len(), "Compacted identifier slots");

        match candidates.len() {
            0 => Err(AltmetricError::NoIdentifier),
            1 => Identifier::from_path(&candidates.remove(0)),
            count => Err(AltmetricError::MultipleIdentifiers { count }),
        }
    }
}

impl From<Identifier> for IdentifierQuery {
    fn from(identifier: Identifier) -> Self {
        let query = IdentifierQuery::new();
        let value = identifier.value;
        match identifier.kind {
            IdentifierKind::Id => query.id(value),
            IdentifierKind::Doi => query.doi(value),
            IdentifierKind::Pmid => query.pmid(value),
            IdentifierKind::Arxiv => query.arxiv(value),
            IdentifierKind::Isbn => query.isbn(value),
            IdentifierKind::Uri => query.uri(value),
        }
    }
}

/// Drop absent and blank candidates, keeping order
///
/// A blank `oid` path reaches this filter untouched and counts as absent.
pub fn compact<I>(candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = Option<String>>,
{
    candidates
        .into_iter()
        .flatten()
        .filter(|candidate| !candidate.trim().is_empty())
        .collect()
}
