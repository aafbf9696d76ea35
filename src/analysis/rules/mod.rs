// Each rule is a pure function of the analysis context

mod ids;
mod required_size;
mod size_annotation;
mod style_cycle;
mod translation;
mod typography;

use super::{AnalysisContext, Finding, Issue};

/// The closed set of rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    RequiredSize,
    Translation,
    Ids,
    StyleCycle,
    SizeAnnotation,
    Typography,
    ParseErrors,
}

impl Rule {
    pub const ALL: [Rule; 7] = [
        Rule::RequiredSize,
        Rule::Translation,
        Rule::Ids,
        Rule::StyleCycle,
        Rule::SizeAnnotation,
        Rule::Typography,
        Rule::ParseErrors,
    ];

    /// Issues the rule can report
    pub fn issues(&self) -> &'static [Issue] {
        match self {
            Rule::RequiredSize => &[Issue::RequiredSize],
            Rule::Translation => &[Issue::MissingTranslation, Issue::ExtraTranslation],
            Rule::Ids => &[Issue::UnknownId, Issue::UnknownIdInLayout, Issue::UnassignedId],
            Rule::StyleCycle => &[Issue::StyleCycle],
            Rule::SizeAnnotation => &[Issue::Range],
            Rule::Typography => &[Issue::TypographyEllipsis],
            Rule::ParseErrors => &[Issue::ParseError],
        }
    }

    pub fn check(&self, context: &AnalysisContext) -> Vec<Finding> {
        match self {
            Rule::RequiredSize => required_size::check(context),
            Rule::Translation => translation::check(context),
            Rule::Ids => ids::check(context),
            Rule::StyleCycle => style_cycle::check(context),
            Rule::SizeAnnotation => size_annotation::check(context),
            Rule::Typography => typography::check(context),
            Rule::ParseErrors => context
                .project
                .failures
                .iter()
                .map(|failure| {
                    Finding::new(
                        Issue::ParseError,
                        failure.location.clone(),
                        format!("The file could not be parsed: {}", failure.message),
                    )
                })
                .collect(),
        }
    }
}
