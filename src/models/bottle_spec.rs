/// Tag of the fallback spec used for unknown bottle types
pub const GENERIC_BOTTLE: &str = "generic";

/// Physical dimensions of a known bottle type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BottleSpec {
    /// Body height in meters
    pub height: f64,
    /// Body diameter in meters
    pub diameter: f64,
    /// Nominal capacity in milliliters
    pub total_volume: f64,
}

/// Process-lifetime spec table; `generic` must stay in it.
static BOTTLE_SPECS: [(&str, BottleSpec); 4] = [
    (
        "water_bottle_500ml",
        BottleSpec {
            height: 0.22,
            diameter: 0.065,
            total_volume: 500.0,
        },
    ),
    (
        "water_bottle_1000ml",
        BottleSpec {
            height: 0.28,
            diameter: 0.075,
            total_volume: 1000.0,
        },
    ),
    (
        "soda_bottle_500ml",
        BottleSpec {
            height: 0.23,
            diameter: 0.065,
            total_volume: 500.0,
        },
    ),
    (
        GENERIC_BOTTLE,
        BottleSpec {
            height: 0.25,
            diameter: 0.070,
            total_volume: 750.0,
        },
    ),
];

impl BottleSpec {
    /// Spec for `tag`, or the generic spec when the tag is unknown
    pub fn lookup(tag: &str) -> &'static BottleSpec {
        Self::find(tag).unwrap_or_else(Self::generic)
    }

    /// The generic fallback spec
    pub fn generic() -> &'static BottleSpec {
        &BOTTLE_SPECS[BOTTLE_SPECS.len() - 1].1
    }

    /// Whether `tag` names an entry in the table
    pub fn is_known(tag: &str) -> bool {
        Self::find(tag).is_some()
    }

    /// All tags in table order
    pub fn tags() -> impl Iterator<Item = &'static str> {
        BOTTLE_SPECS.iter().map(|(tag, _)| *tag)
    }

    /// Radius in meters
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    fn find(tag: &str) -> Option<&'static BottleSpec> {
        BOTTLE_SPECS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, spec)| spec)
    }
}
