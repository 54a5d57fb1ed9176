//! In-memory scene graph
//!
//! This module provides a [`SceneApi`] implementation that keeps nodes and
//! parameters in process. It behaves like a small procedural host:
//!
//! - **Variable expansion**: string parameters expand `$NAME` and `${NAME}`
//!   from scene variables; an unknown variable fails evaluation
//! - **Animation**: keyframed parameters are sampled at the current frame
//! - **Expressions**: Hscript expressions run through an embedded Rhai engine
//!   with `frame` in scope; Python expressions are stored but never evaluated
//! - **Locking**: writes to locked parameters are refused
//! - **Undo groups**: group labels are recorded for inspection
//! - **Fault injection**: individual parameters can be told to fail specific
//!   operations, see [`ParmFault`]
//!
//! # Example
//!
//! ```ignore
//! use parm_transfer::scene::{MemoryNode, MemoryParm, MemoryScene};
//!
//! let mut scene = MemoryScene::new();
//! scene.set_variable("HIP", "/home/user/project");
//! let file = scene.add_node(
//!     MemoryNode::new("/obj/geo1/file1")
//!         .with_parm(MemoryParm::string("file", "Geometry File", "$HIP/tex.png")),
//! );
//! ```

use crate::error::{ParmTransferError, Result, ResultExt};
use crate::types::{
    Expression, ExpressionLanguage, Interpolation, Keyframe, NodeId, ParmHandle, ParmInfo,
    ParmTemplateType, ParmValue, Ramp,
};
use rhai::{Dynamic, Engine, Scope};
use std::collections::{HashMap, HashSet};

use super::SceneApi;

/// Operations a parameter can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParmFault {
    /// `evaluate` fails
    Evaluate,
    /// `raw_string` fails
    RawString,
    /// `expression` fails even when one is attached
    Expression,
    /// `keyframes` fails
    ReadKeyframes,
    /// Every write fails
    Write,
    /// `is_locked` fails
    LockQuery,
}

/// A parameter stored in a [`MemoryNode`]
#[derive(Debug, Clone)]
pub struct MemoryParm {
    pub name: String,
    pub label: String,
    pub template: ParmTemplateType,
    pub menu_labels: Vec<String>,
    pub default: ParmValue,
    pub value: ParmValue,
    pub expression: Option<Expression>,
    pub keyframes: Vec<Keyframe>,
    pub locked: bool,
    faults: HashSet<ParmFault>,
}

impl MemoryParm {
    fn new(name: &str, label: &str, template: ParmTemplateType, default: ParmValue) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            template,
            menu_labels: Vec::new(),
            value: default.clone(),
            default,
            expression: None,
            keyframes: Vec::new(),
            locked: false,
            faults: HashSet::new(),
        }
    }

    pub fn float(name: &str, label: &str, default: f64) -> Self {
        Self::new(name, label, ParmTemplateType::Float, ParmValue::Float(default))
    }

    pub fn int(name: &str, label: &str, default: i64) -> Self {
        Self::new(name, label, ParmTemplateType::Int, ParmValue::Int(default))
    }

    pub fn toggle(name: &str, label: &str, default: bool) -> Self {
        Self::new(name, label, ParmTemplateType::Toggle, ParmValue::Toggle(default))
    }

    pub fn menu(name: &str, label: &str, items: &[&str], default: i64) -> Self {
        let mut parm = Self::new(name, label, ParmTemplateType::Menu, ParmValue::Int(default));
        parm.menu_labels = items.iter().map(|s| s.to_string()).collect();
        parm
    }

    pub fn string(name: &str, label: &str, default: &str) -> Self {
        Self::new(
            name,
            label,
            ParmTemplateType::String,
            ParmValue::String(default.to_string()),
        )
    }

    pub fn ramp(name: &str, label: &str, default: Ramp) -> Self {
        Self::new(name, label, ParmTemplateType::Ramp, ParmValue::Ramp(default))
    }

    pub fn button(name: &str, label: &str) -> Self {
        Self::new(name, label, ParmTemplateType::Button, ParmValue::Int(0))
    }

    /// A structural parameter (folder, label, separator)
    pub fn structural(name: &str, label: &str, template: ParmTemplateType) -> Self {
        Self::new(name, label, template, ParmValue::Absent)
    }

    pub fn with_value(mut self, value: ParmValue) -> Self {
        self.value = value;
        self
    }

    pub fn with_expression(mut self, expression: Expression) -> Self {
        self.expression = Some(expression);
        self
    }

    /// Set the animation curve. A later key replaces an earlier one at the
    /// same time, as [`SceneApi::set_keyframe`] does.
    pub fn with_keyframes(mut self, keyframes: impl IntoIterator<Item = Keyframe>) -> Self {
        self.keyframes.clear();
        for keyframe in keyframes {
            insert_keyframe(&mut self.keyframes, keyframe);
        }
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn with_fault(mut self, fault: ParmFault) -> Self {
        self.faults.insert(fault);
        self
    }

    pub fn set_fault(&mut self, fault: ParmFault, enabled: bool) {
        if enabled {
            self.faults.insert(fault);
        } else {
            self.faults.remove(&fault);
        }
    }

    fn has_fault(&self, fault: ParmFault) -> bool {
        self.faults.contains(&fault)
    }

    fn info(&self, handle: ParmHandle) -> ParmInfo {
        ParmInfo {
            handle,
            name: self.name.clone(),
            label: self.label.clone(),
            template: self.template,
            menu_labels: self.menu_labels.clone(),
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.locked {
            return Err(ParmTransferError::Locked(self.name.clone()));
        }
        if self.has_fault(ParmFault::Write) {
            return Err(ParmTransferError::Write {
                parm: self.name.clone(),
                message: "host rejected the write".to_string(),
            });
        }
        Ok(())
    }

    /// Shape a sampled scalar to the parameter's template
    fn coerce_scalar(&self, v: f64) -> ParmValue {
        match self.template {
            ParmTemplateType::Toggle => ParmValue::Toggle(v != 0.0),
            ParmTemplateType::Int | ParmTemplateType::Menu => ParmValue::Int(v.round() as i64),
            ParmTemplateType::String => ParmValue::String(v.to_string()),
            _ => ParmValue::Float(v),
        }
    }

    /// Check a value against the template and normalize it for storage
    fn accept(&self, value: ParmValue) -> Result<ParmValue> {
        let accepted = match (self.template, value) {
            (ParmTemplateType::Float, ParmValue::Float(v)) => ParmValue::Float(v),
            (ParmTemplateType::Float, ParmValue::Int(v)) => ParmValue::Float(v as f64),
            (ParmTemplateType::Int, ParmValue::Int(v)) => ParmValue::Int(v),
            (ParmTemplateType::Int, ParmValue::Float(v)) => ParmValue::Int(v.round() as i64),
            (ParmTemplateType::Toggle, ParmValue::Toggle(b)) => ParmValue::Toggle(b),
            (ParmTemplateType::Toggle, ParmValue::Int(v)) => ParmValue::Toggle(v != 0),
            (ParmTemplateType::Menu, ParmValue::Int(idx)) => {
                if idx < 0 || idx as usize >= self.menu_labels.len() {
                    return Err(ParmTransferError::Write {
                        parm: self.name.clone(),
                        message: format!("menu index {} out of range", idx),
                    });
                }
                ParmValue::Int(idx)
            }
            (ParmTemplateType::String, ParmValue::String(s)) => ParmValue::String(s),
            (ParmTemplateType::Ramp, ParmValue::Ramp(r)) => ParmValue::Ramp(r),
            (ParmTemplateType::Button | ParmTemplateType::Data, v)
                if !matches!(v, ParmValue::Absent) =>
            {
                v
            }
            (template, v) => {
                return Err(ParmTransferError::TypeMismatch {
                    parm: self.name.clone(),
                    expected: format!("{:?}", template),
                    found: v.kind_name().to_string(),
                })
            }
        };
        Ok(accepted)
    }
}

/// A node stored in a [`MemoryScene`]
#[derive(Debug, Clone)]
pub struct MemoryNode {
    pub path: String,
    pub parms: Vec<MemoryParm>,
    /// Expression languages this node accepts in `set_expression`
    pub languages: Vec<ExpressionLanguage>,
}

impl MemoryNode {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            parms: Vec::new(),
            languages: vec![ExpressionLanguage::Hscript, ExpressionLanguage::Python],
        }
    }

    pub fn with_parm(mut self, parm: MemoryParm) -> Self {
        self.parms.push(parm);
        self
    }

    /// Restrict which expression languages the node accepts
    pub fn accepting(mut self, languages: &[ExpressionLanguage]) -> Self {
        self.languages = languages.to_vec();
        self
    }

    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// In-process scene graph implementing [`SceneApi`]
pub struct MemoryScene {
    /// Removed nodes leave a hole so stale handles stay detectable
    nodes: Vec<Option<MemoryNode>>,
    variables: HashMap<String, String>,
    frame: f64,
    selection: Vec<NodeId>,
    undo_groups: Vec<String>,
    open_undo_groups: usize,
    engine: Engine,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_max_operations(10_000);
        engine.set_max_expr_depths(64, 32);

        Self {
            nodes: Vec::new(),
            variables: HashMap::new(),
            frame: 1.0,
            selection: Vec::new(),
            undo_groups: Vec::new(),
            open_undo_groups: 0,
            engine,
        }
    }

    pub fn add_node(&mut self, node: MemoryNode) -> NodeId {
        self.nodes.push(Some(node));
        NodeId((self.nodes.len() - 1) as u32)
    }

    /// Delete a node; its handle stops resolving
    pub fn remove_node(&mut self, id: NodeId) -> Option<MemoryNode> {
        self.selection.retain(|n| *n != id);
        self.nodes.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub fn set_variable(&mut self, name: &str, value: &str) {
        self.variables.insert(name.to_string(), value.to_string());
    }

    pub fn frame(&self) -> f64 {
        self.frame
    }

    pub fn set_frame(&mut self, frame: f64) {
        self.frame = frame;
    }

    /// Replace the network editor selection
    pub fn select(&mut self, nodes: &[NodeId]) {
        self.selection = nodes.to_vec();
    }

    /// Labels of every undo group opened so far
    pub fn undo_groups(&self) -> &[String] {
        &self.undo_groups
    }

    pub fn open_undo_groups(&self) -> usize {
        self.open_undo_groups
    }

    /// All live nodes with their handles
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MemoryNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    /// Direct access to a stored parameter, for inspection
    pub fn parm(&self, node: NodeId, name: &str) -> Option<&MemoryParm> {
        self.node(node)
            .ok()
            .and_then(|n| n.parms.iter().find(|p| p.name == name))
    }

    /// Direct mutable access to a stored parameter
    pub fn parm_mut(&mut self, node: NodeId, name: &str) -> Option<&mut MemoryParm> {
        self.nodes
            .get_mut(node.0 as usize)
            .and_then(Option::as_mut)
            .and_then(|n| n.parms.iter_mut().find(|p| p.name == name))
    }

    fn node(&self, id: NodeId) -> Result<&MemoryNode> {
        self.nodes
            .get(id.0 as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| ParmTransferError::NodeNotFound(id.to_string()))
    }

    fn lookup(&self, handle: ParmHandle) -> Result<&MemoryParm> {
        self.node(handle.node)?
            .parms
            .get(handle.index)
            .ok_or_else(|| ParmTransferError::ParmNotFound {
                node: handle.node,
                name: format!("index {}", handle.index),
            })
    }

    fn lookup_mut(&mut self, handle: ParmHandle) -> Result<&mut MemoryParm> {
        self.nodes
            .get_mut(handle.node.0 as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| ParmTransferError::NodeNotFound(handle.node.to_string()))?
            .parms
            .get_mut(handle.index)
            .ok_or_else(|| ParmTransferError::ParmNotFound {
                node: handle.node,
                name: format!("index {}", handle.index),
            })
    }

    /// Expand `$NAME` and `${NAME}` references
    fn expand(&self, parm: &MemoryParm, raw: &str) -> Result<String> {
        let mut out = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }

            let mut name = String::new();
            if chars.peek() == Some(&'{') {
                chars.next();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                // `${}` and an unterminated `${NAME` stay literal
                if name.is_empty() || !closed {
                    out.push_str("${");
                    out.push_str(&name);
                    if closed {
                        out.push('}');
                    }
                    continue;
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        name.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
            }

            if name.is_empty() {
                out.push('$');
                continue;
            }

            match self.variables.get(&name) {
                Some(value) => out.push_str(value),
                None => {
                    return Err(ParmTransferError::Evaluation {
                        parm: parm.name.clone(),
                        message: format!("unresolved variable ${}", name),
                    })
                }
            }
        }

        Ok(out)
    }

    fn eval_expression(&self, parm: &MemoryParm, expression: &Expression) -> Result<ParmValue> {
        if expression.language != ExpressionLanguage::Hscript {
            return Err(ParmTransferError::Evaluation {
                parm: parm.name.clone(),
                message: format!("{} expressions cannot be evaluated", expression.language),
            });
        }

        let mut scope = Scope::new();
        scope.push("frame", self.frame);

        let result: Dynamic = self
            .engine
            .eval_with_scope::<Dynamic>(&mut scope, &expression.text)
            .with_context(|| format!("Failed to evaluate expression on '{}'", parm.name))?;

        if let Ok(v) = result.as_float() {
            Ok(parm.coerce_scalar(v))
        } else if let Ok(v) = result.as_int() {
            Ok(parm.coerce_scalar(v as f64))
        } else if let Ok(b) = result.as_bool() {
            Ok(parm.coerce_scalar(if b { 1.0 } else { 0.0 }))
        } else if result.is_string() {
            Ok(ParmValue::String(result.to_string()))
        } else {
            Err(ParmTransferError::Evaluation {
                parm: parm.name.clone(),
                message: format!("expression produced unsupported {}", result.type_name()),
            })
        }
    }
}

/// Insert into a time-sorted curve, replacing any key at the same time
fn insert_keyframe(keys: &mut Vec<Keyframe>, keyframe: Keyframe) {
    match keys.iter_mut().find(|k| k.time == keyframe.time) {
        Some(existing) => *existing = keyframe,
        None => {
            let at = keys.partition_point(|k| k.time < keyframe.time);
            keys.insert(at, keyframe);
        }
    }
}

/// Sample an ordered keyframe list at `frame`
pub fn sample_keyframes(keys: &[Keyframe], frame: f64) -> Option<f64> {
    let first = keys.first()?;
    let last = keys.last()?;

    if frame <= first.time {
        return Some(first.value);
    }
    if frame >= last.time {
        return Some(last.value);
    }

    for pair in keys.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if frame < a.time || frame > b.time {
            continue;
        }
        let span = b.time - a.time;
        if span <= 0.0 {
            return Some(b.value);
        }
        let t = (frame - a.time) / span;
        let w = match a.interpolation {
            Interpolation::Constant => 0.0,
            Interpolation::Linear => t,
            Interpolation::Ease | Interpolation::Cubic | Interpolation::Bezier => {
                t * t * (3.0 - 2.0 * t)
            }
        };
        return Some(a.value + (b.value - a.value) * w);
    }

    Some(last.value)
}

impl SceneApi for MemoryScene {
    fn find_node(&self, path: &str) -> Option<NodeId> {
        self.nodes()
            .find(|(_, node)| node.path == path)
            .map(|(id, _)| id)
    }

    fn node_path(&self, node: NodeId) -> Result<String> {
        Ok(self.node(node)?.path.clone())
    }

    fn node_name(&self, node: NodeId) -> Result<String> {
        Ok(self.node(node)?.name().to_string())
    }

    fn selected_nodes(&self) -> Vec<NodeId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.node(*id).is_ok())
            .collect()
    }

    fn list_parameters(&self, node: NodeId) -> Result<Vec<ParmInfo>> {
        Ok(self
            .node(node)?
            .parms
            .iter()
            .enumerate()
            .map(|(i, p)| p.info(ParmHandle::new(node, i)))
            .collect())
    }

    fn find_parameter(&self, node: NodeId, name: &str) -> Option<ParmHandle> {
        let node_ref = self.node(node).ok()?;
        node_ref
            .parms
            .iter()
            .position(|p| p.name == name)
            .map(|i| ParmHandle::new(node, i))
    }

    fn evaluate(&self, parm: ParmHandle) -> Result<ParmValue> {
        let p = self.lookup(parm)?;
        if p.has_fault(ParmFault::Evaluate) {
            return Err(ParmTransferError::Evaluation {
                parm: p.name.clone(),
                message: "evaluation failed".to_string(),
            });
        }

        if let Some(v) = sample_keyframes(&p.keyframes, self.frame) {
            return Ok(p.coerce_scalar(v));
        }

        if let Some(expression) = &p.expression {
            return self.eval_expression(p, expression);
        }

        match &p.value {
            ParmValue::String(raw) => self.expand(p, raw).map(ParmValue::String),
            other => Ok(other.clone()),
        }
    }

    fn raw_string(&self, parm: ParmHandle) -> Result<String> {
        let p = self.lookup(parm)?;
        if p.has_fault(ParmFault::RawString) {
            return Err(ParmTransferError::Evaluation {
                parm: p.name.clone(),
                message: "raw string unavailable".to_string(),
            });
        }

        if let Some(expression) = &p.expression {
            return Ok(expression.text.clone());
        }

        Ok(match &p.value {
            ParmValue::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn is_at_default(&self, parm: ParmHandle) -> Result<bool> {
        let p = self.lookup(parm)?;
        if p.keyframes.is_empty() && p.expression.is_none() {
            return Ok(p.value == p.default);
        }
        // Animated and expression-driven parameters compare their current value
        let value = self.evaluate(parm)?;
        Ok(p.accept(value).is_ok_and(|v| v == p.default))
    }

    fn is_time_dependent(&self, parm: ParmHandle) -> Result<bool> {
        Ok(!self.lookup(parm)?.keyframes.is_empty())
    }

    fn expression(&self, parm: ParmHandle) -> Result<Expression> {
        let p = self.lookup(parm)?;
        if p.has_fault(ParmFault::Expression) {
            return Err(ParmTransferError::Evaluation {
                parm: p.name.clone(),
                message: "expression unavailable".to_string(),
            });
        }
        p.expression
            .clone()
            .ok_or_else(|| ParmTransferError::NoExpression(p.name.clone()))
    }

    fn keyframes(&self, parm: ParmHandle) -> Result<Vec<Keyframe>> {
        let p = self.lookup(parm)?;
        if p.has_fault(ParmFault::ReadKeyframes) {
            return Err(ParmTransferError::Keyframes {
                parm: p.name.clone(),
                message: "keyframes unavailable".to_string(),
            });
        }
        Ok(p.keyframes.clone())
    }

    fn is_locked(&self, parm: ParmHandle) -> Result<bool> {
        let p = self.lookup(parm)?;
        if p.has_fault(ParmFault::LockQuery) {
            return Err(ParmTransferError::Evaluation {
                parm: p.name.clone(),
                message: "lock state unavailable".to_string(),
            });
        }
        Ok(p.locked)
    }

    fn set(&mut self, parm: ParmHandle, value: ParmValue) -> Result<()> {
        let p = self.lookup_mut(parm)?;
        p.ensure_writable()?;
        p.value = p.accept(value)?;
        p.expression = None;
        p.keyframes.clear();
        Ok(())
    }

    fn set_expression(&mut self, parm: ParmHandle, expression: &Expression) -> Result<()> {
        let node = self.node(parm.node)?;
        if !node.languages.contains(&expression.language) {
            let name = self.lookup(parm)?.name.clone();
            return Err(ParmTransferError::UnsupportedLanguage {
                parm: name,
                language: expression.language,
            });
        }

        let p = self.lookup_mut(parm)?;
        p.ensure_writable()?;
        p.expression = Some(expression.clone());
        p.keyframes.clear();
        Ok(())
    }

    fn set_keyframe(&mut self, parm: ParmHandle, keyframe: &Keyframe) -> Result<()> {
        let p = self.lookup_mut(parm)?;
        p.ensure_writable()?;
        p.expression = None;

        insert_keyframe(&mut p.keyframes, *keyframe);
        Ok(())
    }

    fn delete_all_keyframes(&mut self, parm: ParmHandle) -> Result<()> {
        let p = self.lookup_mut(parm)?;
        p.ensure_writable()?;
        p.keyframes.clear();
        Ok(())
    }

    fn begin_undo_group(&mut self, label: &str) {
        self.undo_groups.push(label.to_string());
        self.open_undo_groups += 1;
    }

    fn end_undo_group(&mut self) {
        self.open_undo_groups = self.open_undo_groups.saturating_sub(1);
    }
}
