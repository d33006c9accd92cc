//! Component compiler: rules document → `ComponentGraph`.
//!
//! Compilation either yields a fully cross-validated graph or fails; no
//! partial graph escapes. It runs in two passes:
//!
//! 1. Collect aliases and the names of every action, controlled action,
//!    condition and phase, assigning ids in declaration order.
//! 2. Compile each record body against those names, so references may
//!    point forward.
//!
//! Controlled actions that could run themselves through their branches
//! are rejected. Cycles among conditions are detected when evaluated.

mod phases;
mod records;
mod scope;
mod statements;
mod tokens;

use rustc_hash::FxHashMap;

use crate::components::{
    Action, ActionId, Alias, ComponentGraph, Condition, ConditionId, ControlledAction,
    ControlledId, Performable, PhaseId, Repeat,
};
use crate::core::{CompileError, CompileResult};
use crate::document::RuleDocument;
use crate::operations::Operation;
use crate::zones::BoardLayout;

use records::{negatable_header, plain_header, split, Record};
use scope::Scope;

/// Compiles rules documents.
pub struct ComponentCompiler;

impl ComponentCompiler {
    /// Compile every component of `rules` against the pile names of
    /// `layout`.
    pub fn compile(rules: &RuleDocument, layout: &BoardLayout) -> CompileResult<ComponentGraph> {
        let mut scope = Scope::new(rules.identity(), layout);
        let mut graph = ComponentGraph::empty();

        graph.aliases = Self::collect_aliases(rules, &mut scope)?;

        let actions = split(rules, "action", "end-action")?;
        let controlled = split(rules, "controlled-action", "end-controlled-action")?;
        let conditions = split(rules, "condition", "end-condition")?;
        let phases = split(rules, "phase", "end-phase")?;

        for (i, record) in actions.iter().enumerate() {
            let name = plain_header(rules, "action", &record.header)?;
            Self::declare(&mut scope.actions, "action", name, ActionId::new(i as u32))?;
        }
        for (i, record) in controlled.iter().enumerate() {
            let name = plain_header(rules, "controlled-action", &record.header)?;
            if scope.actions.contains_key(name) {
                return Err(CompileError::DuplicateComponent {
                    kind: "action",
                    name: name.to_string(),
                });
            }
            Self::declare(
                &mut scope.controlled,
                "controlled-action",
                name,
                ControlledId::new(i as u32),
            )?;
        }
        for (i, record) in conditions.iter().enumerate() {
            let (name, _) = negatable_header(rules, "condition", &record.header)?;
            if Operation::from_keyword(name).is_some() {
                return Err(CompileError::InvalidComponent {
                    kind: "condition",
                    component: name.to_string(),
                    reason: "name is an operation verb".to_string(),
                });
            }
            Self::declare(
                &mut scope.conditions,
                "condition",
                name,
                ConditionId::new(i as u32),
            )?;
        }
        for (i, record) in phases.iter().enumerate() {
            let name = plain_header(rules, "phase", &record.header)?;
            Self::declare(&mut scope.phases, "phase", name, PhaseId::new(i as u32))?;
        }

        for record in &actions {
            graph.actions.register(Self::compile_action(&scope, rules, record)?)?;
        }
        for record in &controlled {
            graph
                .controlled
                .register(Self::compile_controlled(&scope, rules, record)?)?;
        }
        for record in &conditions {
            let (name, inverted) = negatable_header(rules, "condition", &record.header)?;
            graph.conditions.register(Condition {
                name: name.to_string(),
                statements: statements::parse_statements(&scope, name, &record.body)?,
                inverted,
            })?;
        }
        for record in &phases {
            let name = plain_header(rules, "phase", &record.header)?;
            graph
                .phases
                .register(phases::compile_phase(&scope, name, &record.body)?)?;
        }

        Self::check_controlled_cycles(&graph)?;

        log::debug!(
            "compiled {}: {} actions, {} controlled actions, {} conditions, {} phases",
            rules.identity(),
            graph.actions.len(),
            graph.controlled.len(),
            graph.conditions.len(),
            graph.phases.len()
        );
        Ok(graph)
    }

    fn declare<I: Copy>(
        names: &mut FxHashMap<String, I>,
        kind: &'static str,
        name: &str,
        id: I,
    ) -> CompileResult<()> {
        if names.insert(name.to_string(), id).is_some() {
            return Err(CompileError::DuplicateComponent {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn collect_aliases(rules: &RuleDocument, scope: &mut Scope<'_>) -> CompileResult<Vec<Alias>> {
        let mut aliases = Vec::new();
        for index in rules.positions("alias") {
            let params = rules.check_params_at(index, "alias")?;
            let mut tokens = tokens::split_line(params);
            let name = tokens.remove(0);
            if tokens.is_empty() {
                return Err(CompileError::MissingParameter {
                    document: rules.identity(),
                    keyword: format!("alias {}", name),
                    line: index,
                });
            }
            if scope.aliases.contains_key(&name) {
                return Err(CompileError::DuplicateComponent { kind: "alias", name });
            }
            scope.aliases.insert(name.clone(), tokens.clone());
            aliases.push(Alias {
                name,
                replacement: tokens,
            });
        }
        Ok(aliases)
    }

    fn compile_action(scope: &Scope<'_>, rules: &RuleDocument, record: &Record) -> CompileResult<Action> {
        let name = plain_header(rules, "action", &record.header)?;
        let Some((verb_line, description)) = record.body.split_first() else {
            return Err(CompileError::MissingParameter {
                document: rules.identity(),
                keyword: format!("action {}", name),
                line: record.line,
            });
        };
        let tokens = tokens::expand_aliases(scope, tokens::split_line(verb_line));
        let (verb, params) = tokens.split_first().ok_or_else(|| CompileError::MissingParameter {
            document: rules.identity(),
            keyword: format!("action {}", name),
            line: record.line,
        })?;
        let operation = Operation::from_keyword(verb).ok_or_else(|| {
            CompileError::InvalidTypeReference {
                document: rules.identity(),
                expected: "operation".to_string(),
                name: verb.clone(),
            }
        })?;
        Ok(Action {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.join(" ")),
            operation,
            params: tokens::parse_params(scope, name, operation, params)?,
        })
    }

    fn compile_controlled(
        scope: &Scope<'_>,
        rules: &RuleDocument,
        record: &Record,
    ) -> CompileResult<ControlledAction> {
        let name = plain_header(rules, "controlled-action", &record.header)?;
        let Some((control_line, rest)) = record.body.split_first() else {
            return Err(CompileError::MissingParameter {
                document: rules.identity(),
                keyword: format!("controlled-action {}", name),
                line: record.line,
            });
        };
        let control = statements::parse_control(scope, name, control_line)?;

        let mut repeat = None;
        let mut description = Vec::new();
        for line in rest {
            if line.split_whitespace().next() == Some("repeat") {
                if repeat.is_some() {
                    return Err(CompileError::InvalidComponent {
                        kind: "controlled-action",
                        component: name.to_string(),
                        reason: "more than one `repeat` line".to_string(),
                    });
                }
                repeat = Some(statements::parse_repeat(scope, line)?);
            } else {
                description.push(line.as_str());
            }
        }

        Ok(ControlledAction {
            name: name.to_string(),
            description: (!description.is_empty()).then(|| description.join(" ")),
            condition: control.condition,
            on_true: control.on_true,
            on_false: control.on_false,
            repeat: repeat.unwrap_or(Repeat::Once),
        })
    }

    /// Reject controlled actions that can reach themselves through their
    /// branches.
    fn check_controlled_cycles(graph: &ComponentGraph) -> CompileResult<()> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        fn visit(graph: &ComponentGraph, id: ControlledId, marks: &mut [Mark]) -> CompileResult<()> {
            match marks[id.index()] {
                Mark::Done => return Ok(()),
                Mark::Active => {
                    let name = graph
                        .controlled
                        .get(id)
                        .map_or_else(|| id.to_string(), |c| c.name.clone());
                    return Err(CompileError::InvalidComponent {
                        kind: "controlled-action",
                        component: name,
                        reason: "runs itself through its branches".to_string(),
                    });
                }
                Mark::New => {}
            }
            marks[id.index()] = Mark::Active;
            if let Some(action) = graph.controlled.get(id) {
                for branch in action.branches() {
                    if let Performable::Controlled(next) = branch {
                        visit(graph, next, marks)?;
                    }
                }
            }
            marks[id.index()] = Mark::Done;
            Ok(())
        }

        let mut marks = vec![Mark::New; graph.controlled.len()];
        for (id, _) in graph.controlled.iter() {
            visit(graph, id, &mut marks)?;
        }
        Ok(())
    }
}
