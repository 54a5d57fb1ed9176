//! Core data types for parm-transfer
//!
//! This module contains the value-level vocabulary shared by the scene
//! abstraction, the snapshot layer and the transfer resolver.
//!
//! # Main Types
//!
//! - [`NodeId`] / [`ParmHandle`] - Opaque handles into the host scene
//! - [`ParmTemplateType`] - The host's parameter template types, structural ones included
//! - [`TypeClass`] - The closed set of value-bearing classes the resolver dispatches on
//! - [`ParmValue`] - An evaluated parameter value
//! - [`Keyframe`] / [`Interpolation`] - Animation samples
//! - [`Expression`] / [`ExpressionLanguage`] - Procedural formulas

/// Handle to a node in the host scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a single parameter on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParmHandle {
    /// Owning node
    pub node: NodeId,
    /// Position of the parameter within the node's parameter list
    pub index: usize,
}

impl ParmHandle {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// Parameter template types as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParmTemplateType {
    Int,
    Float,
    Toggle,
    Menu,
    String,
    Ramp,
    Button,
    Data,
    Folder,
    FolderSet,
    Label,
    Separator,
}

impl ParmTemplateType {
    /// Layout-only templates that carry no value
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ParmTemplateType::Folder
                | ParmTemplateType::FolderSet
                | ParmTemplateType::Label
                | ParmTemplateType::Separator
        )
    }

    /// The type class this template belongs to, `None` for structural templates
    pub fn type_class(&self) -> Option<TypeClass> {
        match self {
            ParmTemplateType::Int | ParmTemplateType::Float => Some(TypeClass::Numeric),
            ParmTemplateType::Toggle => Some(TypeClass::Toggle),
            ParmTemplateType::Menu => Some(TypeClass::Menu),
            ParmTemplateType::String => Some(TypeClass::String),
            ParmTemplateType::Ramp => Some(TypeClass::Ramp),
            ParmTemplateType::Button | ParmTemplateType::Data => Some(TypeClass::Other),
            ParmTemplateType::Folder
            | ParmTemplateType::FolderSet
            | ParmTemplateType::Label
            | ParmTemplateType::Separator => None,
        }
    }
}

/// Value-bearing parameter classes
///
/// Display derivation and copy strategy both match on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    String,
    Toggle,
    Menu,
    Ramp,
    Numeric,
    Other,
}

/// Interpolation between ramp keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampBasis {
    Constant,
    #[default]
    Linear,
    CatmullRom,
    Bezier,
}

/// A single ramp control point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampKey {
    pub position: f64,
    pub value: f64,
}

/// Ramp contents, copied as a whole and never diffed
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ramp {
    pub basis: RampBasis,
    pub keys: Vec<RampKey>,
}

impl Ramp {
    pub fn new(basis: RampBasis, keys: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            basis,
            keys: keys
                .into_iter()
                .map(|(position, value)| RampKey { position, value })
                .collect(),
        }
    }
}

/// An evaluated parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParmValue {
    Float(f64),
    Int(i64),
    Toggle(bool),
    String(String),
    Ramp(Ramp),
    /// No value could be obtained
    Absent,
}

impl ParmValue {
    /// Numeric view of scalar values
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParmValue::Float(v) => Some(*v),
            ParmValue::Int(v) => Some(*v as f64),
            ParmValue::Toggle(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Menu index view; floats truncate toward zero
    pub fn as_index(&self) -> Option<i64> {
        match self {
            ParmValue::Int(v) => Some(*v),
            ParmValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            ParmValue::Toggle(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Truthiness used for toggle display
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParmValue::Toggle(b) => Some(*b),
            ParmValue::Int(v) => Some(*v != 0),
            ParmValue::Float(v) => Some(*v != 0.0),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParmValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in type mismatch errors
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParmValue::Float(_) => "float",
            ParmValue::Int(_) => "int",
            ParmValue::Toggle(_) => "toggle",
            ParmValue::String(_) => "string",
            ParmValue::Ramp(_) => "ramp",
            ParmValue::Absent => "absent",
        }
    }
}

/// Plain string form of a value
impl std::fmt::Display for ParmValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParmValue::Float(v) => write!(f, "{}", v),
            ParmValue::Int(v) => write!(f, "{}", v),
            ParmValue::Toggle(b) => write!(f, "{}", u8::from(*b)),
            ParmValue::String(s) => write!(f, "{}", s),
            ParmValue::Ramp(r) => write!(f, "<ramp: {} keys>", r.keys.len()),
            ParmValue::Absent => write!(f, "None"),
        }
    }
}

/// Keyframe interpolation into the next segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    Constant,
    Linear,
    Ease,
    Cubic,
    #[default]
    Bezier,
}

/// A (time, value, interpolation) animation sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Time in frames
    pub time: f64,
    pub value: f64,
    pub interpolation: Interpolation,
}

impl Keyframe {
    pub fn new(time: f64, value: f64, interpolation: Interpolation) -> Self {
        Self {
            time,
            value,
            interpolation,
        }
    }
}

/// Expression dialects a host may accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionLanguage {
    Hscript,
    Python,
}

impl std::fmt::Display for ExpressionLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpressionLanguage::Hscript => write!(f, "Hscript"),
            ExpressionLanguage::Python => write!(f, "Python"),
        }
    }
}

/// An expression attached to a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub text: String,
    pub language: ExpressionLanguage,
}

impl Expression {
    pub fn new(text: impl Into<String>, language: ExpressionLanguage) -> Self {
        Self {
            text: text.into(),
            language,
        }
    }

    pub fn hscript(text: impl Into<String>) -> Self {
        Self::new(text, ExpressionLanguage::Hscript)
    }

    pub fn python(text: impl Into<String>) -> Self {
        Self::new(text, ExpressionLanguage::Python)
    }
}

/// Identity of a parameter as listed by the scene
#[derive(Debug, Clone, PartialEq)]
pub struct ParmInfo {
    pub handle: ParmHandle,
    pub name: String,
    pub label: String,
    pub template: ParmTemplateType,
    /// Menu item labels, empty for non-menu parameters
    pub menu_labels: Vec<String>,
}
