//! Parameter snapshots
//!
//! A [`ParameterDescriptor`] captures the state of one source parameter at
//! the moment the source node is loaded: its evaluated value, a display
//! string, and the default/keyframe/expression flags the table and the
//! resolver work from. Descriptors are immutable; a refresh rebuilds the
//! whole list with [`load_parameters`].
//!
//! Snapshotting never fails. Every host query that can go wrong has a
//! documented fallback:
//!
//! | Query | Fallback |
//! |-------|----------|
//! | evaluate | raw string, then [`ParmValue::Absent`] |
//! | raw string | none recorded |
//! | at default | `false` (listed as modified) |
//! | time dependent | `false` |
//! | expression probe | no expression |
//!
//! Lock state is deliberately not captured; the resolver queries it live.

use crate::error::Result;
use crate::scene::SceneApi;
use crate::types::{Expression, NodeId, ParmHandle, ParmInfo, ParmValue, TypeClass};

/// Strings longer than this are truncated for display
pub const MAX_DISPLAY_CHARS: usize = 50;

/// Placeholder shown for ramp parameters
pub const RAMP_PLACEHOLDER: &str = "[Ramp Data]";

/// Significant digits used for floating point display
pub const DISPLAY_SIGNIFICANT_DIGITS: usize = 6;

/// Immutable snapshot of one source parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    handle: ParmHandle,
    name: String,
    label: String,
    type_class: TypeClass,
    value: ParmValue,
    raw_text: Option<String>,
    value_display: String,
    is_at_default: bool,
    has_keyframes: bool,
    has_expression: bool,
    expression: Option<Expression>,
}

impl ParameterDescriptor {
    /// Handle of the live source parameter
    pub fn handle(&self) -> ParmHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn type_class(&self) -> TypeClass {
        self.type_class
    }

    /// Value at the time of the snapshot
    pub fn value(&self) -> &ParmValue {
        &self.value
    }

    /// Unevaluated string form, if the host could provide one
    pub fn raw_text(&self) -> Option<&str> {
        self.raw_text.as_deref()
    }

    pub fn value_display(&self) -> &str {
        &self.value_display
    }

    pub fn is_at_default(&self) -> bool {
        self.is_at_default
    }

    pub fn has_keyframes(&self) -> bool {
        self.has_keyframes
    }

    pub fn has_expression(&self) -> bool {
        self.has_expression
    }

    /// Expression captured when `has_expression` is set
    pub fn expression(&self) -> Option<&Expression> {
        self.expression.as_ref()
    }

    /// Status column text, e.g. `"🔑 Animated | ✏️ Modified"`
    pub fn status(&self) -> String {
        let mut status = Vec::new();
        if self.has_keyframes {
            status.push("🔑 Animated");
        }
        if self.has_expression {
            status.push("⚡ Expression");
        }
        if !self.is_at_default {
            status.push("✏️ Modified");
        }
        if status.is_empty() {
            "Default".to_string()
        } else {
            status.join(" | ")
        }
    }

    /// Multi-line hover text
    pub fn tooltip(&self) -> String {
        let mut tooltip = format!(
            "Parameter: {}\nLabel: {}\nValue: {}\n",
            self.name, self.label, self.value_display
        );
        if let Some(expression) = &self.expression {
            tooltip.push_str(&format!(
                "Expression: {} ({})",
                expression.text, expression.language
            ));
        }
        tooltip
    }

    /// Case-insensitive match against name or label
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.label.to_lowercase().contains(&needle)
    }
}

/// Snapshot a single value-bearing parameter
///
/// Returns `None` for structural parameters (folders, labels, separators),
/// which callers are expected to skip.
pub fn build_snapshot(scene: &dyn SceneApi, info: &ParmInfo) -> Option<ParameterDescriptor> {
    let type_class = info.template.type_class()?;
    let handle = info.handle;

    let value = capture_value(scene, handle);
    let raw_text = scene.raw_string(handle).ok();

    let is_at_default = scene.is_at_default(handle).unwrap_or_else(|e| {
        tracing::debug!("Default query failed for '{}': {}", info.name, e);
        false
    });
    let has_keyframes = scene.is_time_dependent(handle).unwrap_or_else(|e| {
        tracing::debug!("Time dependence query failed for '{}': {}", info.name, e);
        false
    });

    // Only probe for an expression on parameters without animation
    let expression = if has_keyframes {
        None
    } else {
        scene.expression(handle).ok()
    };

    let value_display = display_value(type_class, &value, &info.menu_labels);

    Some(ParameterDescriptor {
        handle,
        name: info.name.clone(),
        label: info.label.clone(),
        type_class,
        value,
        raw_text,
        value_display,
        is_at_default,
        has_keyframes,
        has_expression: expression.is_some(),
        expression,
    })
}

/// Snapshot every value-bearing parameter on a node, in declaration order
pub fn load_parameters(scene: &dyn SceneApi, node: NodeId) -> Result<Vec<ParameterDescriptor>> {
    let infos = scene.list_parameters(node)?;
    Ok(infos
        .iter()
        .filter_map(|info| build_snapshot(scene, info))
        .collect())
}

/// Evaluate, falling back to the raw string, then to `Absent`
fn capture_value(scene: &dyn SceneApi, handle: ParmHandle) -> ParmValue {
    scene
        .evaluate(handle)
        .or_else(|e| {
            tracing::debug!("Evaluation failed, using raw string: {}", e);
            scene.raw_string(handle).map(ParmValue::String)
        })
        .unwrap_or_else(|e| {
            tracing::debug!("Raw string unavailable, value absent: {}", e);
            ParmValue::Absent
        })
}

/// Type-directed display string for a captured value
pub fn display_value(type_class: TypeClass, value: &ParmValue, menu_labels: &[String]) -> String {
    let derived = match type_class {
        TypeClass::Menu => value.as_index().and_then(|idx| {
            usize::try_from(idx)
                .ok()
                .and_then(|i| menu_labels.get(i))
                .map(|label| format!("{} ({})", label, idx))
        }),
        TypeClass::Toggle => value
            .as_bool()
            .map(|on| if on { "On" } else { "Off" }.to_string()),
        TypeClass::String => value.as_str().map(truncate_for_display),
        TypeClass::Ramp => Some(RAMP_PLACEHOLDER.to_string()),
        TypeClass::Numeric | TypeClass::Other => match value {
            ParmValue::Float(v) => Some(format_significant(*v, DISPLAY_SIGNIFICANT_DIGITS)),
            _ => None,
        },
    };

    derived.unwrap_or_else(|| value.to_string())
}

/// Cut long strings to 47 characters plus `...`
pub fn truncate_for_display(s: &str) -> String {
    if s.chars().count() > MAX_DISPLAY_CHARS {
        let head: String = s.chars().take(MAX_DISPLAY_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Format like C's `%.Ng`: N significant digits, trailing zeros dropped,
/// scientific notation for very large or small magnitudes
pub fn format_significant(v: f64, digits: usize) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let digits = digits.max(1);
    // Rounding to `digits` may bump the exponent, so read it back from the
    // rounded scientific form
    let sci = format!("{:.*e}", digits - 1, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exp < -4 || exp >= digits as i32 {
        let mantissa = trim_fraction(&mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (digits as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, v))
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParmTransferError;
    use crate::scene::{MemoryNode, MemoryParm, MemoryScene, MockSceneApi, ParmFault};
    use crate::types::{Interpolation, Keyframe, ParmTemplateType, Ramp, RampBasis};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_format_significant() {
        assert_eq!(format_significant(4.5, 6), "4.5");
        assert_eq!(format_significant(1.0, 6), "1");
        assert_eq!(format_significant(0.1 + 0.2, 6), "0.3");
        assert_eq!(format_significant(3.14159265, 6), "3.14159");
        assert_eq!(format_significant(123456.7, 6), "123457");
        assert_eq!(format_significant(1234567.0, 6), "1.23457e+06");
        assert_eq!(format_significant(999999.5, 6), "1e+06");
        assert_eq!(format_significant(0.0001, 6), "0.0001");
        assert_eq!(format_significant(0.00001234, 6), "1.234e-05");
        assert_eq!(format_significant(-2.5, 6), "-2.5");
        assert_eq!(format_significant(0.0, 6), "0");
        assert_eq!(format_significant(f64::NAN, 6), "nan");
    }

    #[test]
    fn test_display_menu() {
        let items = labels(&["SRT", "STR", "RST"]);
        assert_eq!(display_value(TypeClass::Menu, &ParmValue::Int(1), &items), "STR (1)");
        assert_eq!(display_value(TypeClass::Menu, &ParmValue::Int(7), &items), "7");
        assert_eq!(display_value(TypeClass::Menu, &ParmValue::Int(-1), &items), "-1");
    }

    #[test]
    fn test_display_toggle_string_ramp() {
        assert_eq!(display_value(TypeClass::Toggle, &ParmValue::Toggle(true), &[]), "On");
        assert_eq!(display_value(TypeClass::Toggle, &ParmValue::Int(0), &[]), "Off");

        let long = "a".repeat(60);
        let shown = display_value(TypeClass::String, &ParmValue::String(long), &[]);
        assert_eq!(shown.chars().count(), 50);
        assert!(shown.ends_with("..."));

        let exact = "b".repeat(50);
        assert_eq!(
            display_value(TypeClass::String, &ParmValue::String(exact.clone()), &[]),
            exact
        );

        let ramp = ParmValue::Ramp(Ramp::new(RampBasis::Linear, [(0.0, 0.0), (1.0, 1.0)]));
        assert_eq!(display_value(TypeClass::Ramp, &ramp, &[]), "[Ramp Data]");
    }

    #[test]
    fn test_display_falls_back_to_plain_form() {
        assert_eq!(display_value(TypeClass::Numeric, &ParmValue::Int(42), &[]), "42");
        assert_eq!(
            display_value(TypeClass::Toggle, &ParmValue::String("yes".into()), &[]),
            "yes"
        );
        assert_eq!(display_value(TypeClass::Numeric, &ParmValue::Absent, &[]), "None");
    }

    #[test]
    fn test_snapshot_flags() {
        let mut scene = MemoryScene::new();
        let node = scene.add_node(
            MemoryNode::new("/obj/src")
                .with_parm(MemoryParm::float("tx", "Translate X", 0.0).with_value(ParmValue::Float(4.5)))
                .with_parm(
                    MemoryParm::float("ty", "Translate Y", 0.0)
                        .with_expression(crate::types::Expression::hscript("frame * 2")),
                )
                .with_parm(MemoryParm::float("sx", "Scale X", 1.0).with_keyframes([
                    Keyframe::new(1.0, 0.5, Interpolation::Linear),
                    Keyframe::new(24.0, 2.0, Interpolation::Linear),
                ]))
                .with_parm(MemoryParm::structural("stdswitcher", "Transform", ParmTemplateType::FolderSet)),
        );

        let descriptors = load_parameters(&scene, node).unwrap();
        assert_eq!(descriptors.len(), 3);

        let tx = &descriptors[0];
        assert_eq!(tx.value_display(), "4.5");
        assert!(!tx.is_at_default());
        assert!(!tx.has_keyframes() && !tx.has_expression());
        assert_eq!(tx.status(), "✏️ Modified");

        let ty = &descriptors[1];
        assert!(ty.has_expression());
        assert_eq!(ty.value(), &ParmValue::Float(2.0));
        assert!(ty.tooltip().contains("Expression: frame * 2"));

        let sx = &descriptors[2];
        assert!(sx.has_keyframes());
        assert!(!sx.has_expression());
        assert_eq!(sx.status(), "🔑 Animated | ✏️ Modified");
    }

    #[test]
    fn test_snapshot_value_fallback_chain() {
        let mut scene = MemoryScene::new();
        let node = scene.add_node(
            MemoryNode::new("/obj/src")
                .with_parm(MemoryParm::string("file", "File", "$UNSET/tex.png"))
                .with_parm(
                    MemoryParm::float("tx", "Translate X", 0.0)
                        .with_fault(ParmFault::Evaluate)
                        .with_fault(ParmFault::RawString),
                ),
        );

        let descriptors = load_parameters(&scene, node).unwrap();
        assert_eq!(
            descriptors[0].value(),
            &ParmValue::String("$UNSET/tex.png".into())
        );
        assert_eq!(descriptors[1].value(), &ParmValue::Absent);
        assert_eq!(descriptors[1].value_display(), "None");
        assert_eq!(descriptors[1].raw_text(), None);
    }

    #[test]
    fn test_snapshot_swallows_query_failures() {
        let handle = ParmHandle::new(NodeId(0), 0);
        let mut scene = MockSceneApi::new();
        scene.expect_evaluate().returning(|_| Ok(ParmValue::Float(1.0)));
        scene.expect_raw_string().returning(|_| Ok("1".to_string()));
        scene
            .expect_is_at_default()
            .returning(|_| Err(ParmTransferError::NodeNotFound("#0".into())));
        scene
            .expect_is_time_dependent()
            .returning(|_| Err(ParmTransferError::NodeNotFound("#0".into())));
        scene
            .expect_expression()
            .returning(|_| Err(ParmTransferError::NoExpression("tx".into())));

        let info = ParmInfo {
            handle,
            name: "tx".into(),
            label: "Translate X".into(),
            template: ParmTemplateType::Float,
            menu_labels: Vec::new(),
        };
        let descriptor = build_snapshot(&scene, &info).unwrap();
        assert!(!descriptor.is_at_default());
        assert!(!descriptor.has_keyframes());
        assert!(!descriptor.has_expression());
    }

    #[test]
    fn test_expression_not_probed_when_animated() {
        let handle = ParmHandle::new(NodeId(0), 0);
        let mut scene = MockSceneApi::new();
        scene.expect_evaluate().returning(|_| Ok(ParmValue::Float(1.0)));
        scene.expect_raw_string().returning(|_| Ok("1".to_string()));
        scene.expect_is_at_default().returning(|_| Ok(false));
        scene.expect_is_time_dependent().returning(|_| Ok(true));
        scene.expect_expression().never();

        let info = ParmInfo {
            handle,
            name: "sx".into(),
            label: "Scale X".into(),
            template: ParmTemplateType::Float,
            menu_labels: Vec::new(),
        };
        let descriptor = build_snapshot(&scene, &info).unwrap();
        assert!(descriptor.has_keyframes());
        assert!(!descriptor.has_expression());
    }

    #[test]
    fn test_matches_text() {
        let mut scene = MemoryScene::new();
        let node = scene.add_node(
            MemoryNode::new("/obj/src").with_parm(MemoryParm::float("tx", "Translate X", 0.0)),
        );
        let d = &load_parameters(&scene, node).unwrap()[0];
        assert!(d.matches_text("TRANS"));
        assert!(d.matches_text("tx"));
        assert!(d.matches_text(""));
        assert!(!d.matches_text("rotate"));
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_format_significant_round_trips(v in -1.0e12f64..1.0e12) {
            let shown = format_significant(v, 6);
            let parsed: f64 = shown.parse().unwrap();
            let tolerance = v.abs() * 1e-5 + 1e-300;
            prop_assert!((parsed - v).abs() <= tolerance, "{} shown as {}", v, shown);
        }

        #[test]
        fn test_truncation_never_exceeds_limit(s in ".{0,120}") {
            let shown = truncate_for_display(&s);
            prop_assert!(shown.chars().count() <= MAX_DISPLAY_CHARS);
        }
    }
}
