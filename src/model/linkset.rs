//! Link-set identifiers: which of the three named chains an object belongs
//! to (spec §3, "Link set").

/// Which named link set an object currently belongs to. An object has at
/// most one anchor at any time; the three sets are disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Objects transitively required by the application's mandatory roots.
    Application,
    /// Remaining objects forcibly included, absent an `Application` pull.
    Optional,
    /// The sentinel set holding the synthetic undefined-pod object.
    Undefined,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Application => "Application",
            Self::Optional => "Optional",
            Self::Undefined => "Undefined",
        }
    }
}
