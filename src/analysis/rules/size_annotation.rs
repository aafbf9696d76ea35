use crate::analysis::{AnalysisContext, Finding, Issue};
use crate::parser::java::{ArgumentValue, CallSite, JavaFile, MethodInfo, SizedParameter};
use std::collections::HashMap;

/// A method with `@Size` parameters and the file declaring it
struct Target<'a> {
    file: &'a JavaFile,
    method: &'a MethodInfo,
}

pub fn check(context: &AnalysisContext) -> Vec<Finding> {
    let mut targets: HashMap<&str, Vec<Target>> = HashMap::new();
    for file in &context.project.java {
        for method in file.methods.iter().filter(|m| !m.sized.is_empty()) {
            targets
                .entry(method.name.as_str())
                .or_default()
                .push(Target { file, method });
        }
    }
    if targets.is_empty() {
        return Vec::new();
    }

    let mut findings = Vec::new();
    for file in &context.project.java {
        for call in &file.calls {
            let Some(target) = resolve(&targets, file, call) else {
                continue;
            };
            for (index, argument) in call.arguments.iter().enumerate() {
                let Some(parameter) = target.method.sized_parameter(index) else {
                    continue;
                };
                let message = match &argument.value {
                    ArgumentValue::Size(value) if !parameter.constraint.is_satisfied_by(*value) => {
                        parameter.constraint.describe_value(*value)
                    }
                    ArgumentValue::Identifier(name) => {
                        match forwarded(file, call, name) {
                            Some(source) if !parameter.constraint.contains(&source.constraint) => {
                                format!(
                                    "Expected Size {} but the argument allows {}",
                                    parameter.constraint.clauses(),
                                    source.constraint.clauses()
                                )
                            }
                            _ => continue,
                        }
                    }
                    _ => continue,
                };
                findings.push(
                    Finding::new(Issue::Range, file.source.location(argument.span), message)
                        .with_secondary(
                            target.file.source.location(parameter.annotation),
                            "Size constraint declared here",
                        ),
                );
            }
        }
    }
    findings
}

/// Method called by `call`, matched by name and arity; same-file declarations win
fn resolve<'a>(
    targets: &'a HashMap<&str, Vec<Target<'a>>>,
    file: &JavaFile,
    call: &CallSite,
) -> Option<&'a Target<'a>> {
    let candidates = targets.get(call.method.as_str())?;
    let mut matching = candidates
        .iter()
        .filter(|t| t.method.parameters.len() == call.arguments.len());
    let first = matching.clone().next();
    matching
        .find(|t| t.file.source.path() == file.source.path())
        .or(first)
}

/// `@Size` parameter of the enclosing method passed straight through
fn forwarded<'a>(file: &'a JavaFile, call: &CallSite, name: &str) -> Option<&'a SizedParameter> {
    let enclosing = &file.methods[call.enclosing?];
    enclosing.sized_parameter_named(name)
}
