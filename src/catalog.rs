//! Static catalog of commodity categories.
//!
//! Each category lists twelve Datastream instrument mnemonics (one per grid
//! cell) and the summary fields shown in the table beneath the charts.

use crate::error::{DashboardError, Result};

/// A provider field code paired with the label shown in the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub code: &'static str,
    pub label: &'static str,
}

const fn field(code: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { code, label }
}

/// Latest value, month-on-month change and one-year extremes.
pub const SUMMARY_FIELDS: &[FieldSpec] = &[
    field("NAME", "Name"),
    field("PCH#(X,-1M)", "(%) Change"),
    field("X", "Current"),
    field("VAL#(X,-1M)", "Previous"),
    field("MAX#(X,-1Y)", "1 Year High"),
    field("MAXD#(X,-1Y)", "High Date"),
    field("MIN#(X,-1Y)", "1 Year Low"),
    field("MIND#(X,-1Y)", "Low Date"),
];

/// Label of the summary column used to title each chart.
pub const NAME_LABEL: &str = "Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: &'static str,
    instruments: &'static [&'static str],
    fields: &'static [FieldSpec],
}

impl Category {
    pub fn instruments(&self) -> &'static [&'static str] {
        self.instruments
    }

    /// Owned copy of the instrument list, as passed to the fetcher.
    pub fn instrument_ids(&self) -> Vec<String> {
        self.instruments.iter().map(|s| s.to_string()).collect()
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    pub fn field_codes(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.code).collect()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.label).collect()
    }

    pub fn label_for(&self, code: &str) -> Option<&'static str> {
        self.fields.iter().find(|f| f.code == code).map(|f| f.label)
    }
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "Metals",
        instruments: &[
            "GOLDBLN", "SILVERH", "PLATFRE", "LAHCASH", "LCPCASH", "LEDCASH", "LNICASH",
            "LTICASH", "LZZCASH", "SHCNI62", "SHCNI58", "SGPDTOT",
        ],
        fields: SUMMARY_FIELDS,
    },
    Category {
        name: "Energy",
        instruments: &[
            "OILBREN", "OILWTXI", "GASUREG", "DIESELA", "JETCNWE", "FUELOIL", "GOTTYOS",
            "NAFCNWE", "NATBGAS", "LMCYSPT", "EEXPEAK", "ES15PSN",
        ],
        fields: SUMMARY_FIELDS,
    },
    Category {
        name: "Chemicals",
        instruments: &[
            "OLETFPU", "OLPRNPU", "ARSYUPU", "VPVCUPU", "PFHPEPU", "PFPCOPU", "STGPDPU",
            "ABSCAUP", "OLBUUPU", "UREAGRN", "DAPNOCB", "ETHANYH",
        ],
        fields: SUMMARY_FIELDS,
    },
    Category {
        name: "Agriculture",
        instruments: &[
            "WHEATSF", "CORNUS2", "COCINUS", "COTTONM", "SOYBEAN", "CLHINDX", "USTEERS",
            "MILKGDA", "CFCNCLC", "CLCNRLC", "WOLAWCE", "SPG2LHS",
        ],
        fields: SUMMARY_FIELDS,
    },
    Category {
        name: "Indices",
        instruments: &[
            "GSCITOT", "DJUBSTR", "RICIXTR", "MLCXTOT", "CRBSPOT", "CXCMTRE", "BALTICF",
            "LMEINDX", "DRAMDXI", "DBKLCIX", "MSWDCY$", "RJEFCRT",
        ],
        fields: SUMMARY_FIELDS,
    },
    Category {
        name: "SemiConductors & Other Commodities",
        instruments: &[
            "SILFEEU", "FMS32GB", "FSS16GB", "FSS08GB", "FMS64GB", "TUNGSFE", "RUBBSMR",
            "PLPLPBL", "MLRIC2S", "CTJOP3M", "EIANYHO", "SPGSLTU",
        ],
        fields: SUMMARY_FIELDS,
    },
];

/// All categories in display order.
pub fn categories() -> &'static [Category] {
    CATEGORIES
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|c| c.name).collect()
}

/// The category offered first in the selector.
pub fn default_category() -> &'static Category {
    &CATEGORIES[0]
}

/// Look up a category by name.
///
/// Exact matches win; otherwise the name is compared ASCII case-insensitively.
pub fn lookup(name: &str) -> Result<&'static Category> {
    CATEGORIES
        .iter()
        .find(|c| c.name == name)
        .or_else(|| CATEGORIES.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
        .ok_or_else(|| DashboardError::NotFound(format!("Unknown category: {}", name)))
}
