//! Component catalog: the closed set of sidecar roles that make up one dataset.
//!
//! A dataset such as `roads` is stored as `roads.shp`, `roads.dbf`,
//! `roads.shx` and friends. Each file plays one [`ComponentRole`], and each
//! role has a canonical lowercase extension. Extensions are pairwise distinct,
//! so suffix matching in [`ComponentRole::ALL`] order is unambiguous.

use std::fmt;
use std::str::FromStr;


/// One sidecar file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComponentRole {
    /// Geometry records.
    Shp,
    /// Attribute table.
    Dbf,
    /// Spatial index over the geometry records.
    Shx,
    /// Projection description (WKT text).
    Prj,
    /// Quad-tree index.
    Qix,
    /// Fixed feature-id index.
    Fix,
    /// XML sidecar metadata.
    ShpXml,
    /// Grid index.
    Grx,
}

impl ComponentRole {
    /// Every role, in the order used when probing a seed identifier.
    pub const ALL: [ComponentRole; 8] = [
        ComponentRole::Shp,
        ComponentRole::Dbf,
        ComponentRole::Shx,
        ComponentRole::Prj,
        ComponentRole::Qix,
        ComponentRole::Fix,
        ComponentRole::ShpXml,
        ComponentRole::Grx,
    ];

    /// Canonical lowercase extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ComponentRole::Shp => "shp",
            ComponentRole::Dbf => "dbf",
            ComponentRole::Shx => "shx",
            ComponentRole::Prj => "prj",
            ComponentRole::Qix => "qix",
            ComponentRole::Fix => "fix",
            ComponentRole::ShpXml => "shp.xml",
            ComponentRole::Grx => "grx",
        }
    }

    /// Strip this role's extension from `identifier`.
    ///
    /// The suffix (`.` plus the extension) is matched ASCII case-insensitively.
    /// Returns `None` when the suffix differs or when stripping it would
    /// leave an empty base.
    ///
    /// ```
    /// use shpfiles::catalog::ComponentRole;
    ///
    /// assert_eq!(ComponentRole::Shp.derive_base("/data/ROADS.SHP"), Some("/data/ROADS"));
    /// assert_eq!(ComponentRole::Dbf.derive_base("/data/roads.shp"), None);
    /// assert_eq!(ComponentRole::Shp.derive_base(".shp"), None);
    /// ```
    pub fn derive_base<'a>(&self, identifier: &'a str) -> Option<&'a str> {
        let ext = self.extension();
        let suffix_len = ext.len() + 1;
        if identifier.len() <= suffix_len {
            return None;
        }

        let split = identifier.len() - suffix_len;
        let tail = &identifier.as_bytes()[split..];
        if tail[0] != b'.' || !tail[1..].eq_ignore_ascii_case(ext.as_bytes()) {
            return None;
        }

        // The matched tail is pure ASCII, so `split` is a char boundary.
        Some(&identifier[..split])
    }

    /// Append this role's canonical extension to `base`.
    pub fn resolve(&self, base: &str) -> String {
        format!("{}.{}", base, self.extension())
    }

    /// Find the first role whose extension ends `identifier`.
    ///
    /// Returns the role and the derived base, or `None` when no role matches.
    pub fn identify(identifier: &str) -> Option<(ComponentRole, &str)> {
        Self::ALL
            .iter()
            .find_map(|role| role.derive_base(identifier).map(|base| (*role, base)))
    }
}

impl fmt::Display for ComponentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown component '{}' (expected one of: shp, dbf, shx, prj, qix, fix, shp.xml, grx)",
            self.0
        )
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for ComponentRole {
    type Err = UnknownRole;

    /// Parse a role from its extension (`dbf`, `.dbf`, `shp.xml`), case-insensitively.
    /// `shp_xml` is accepted as an alias for `shp.xml`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.strip_prefix('.').unwrap_or(s);
        if token.eq_ignore_ascii_case("shp_xml") {
            return Ok(ComponentRole::ShpXml);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.extension().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
