use crate::constants::EXCLUDED_TAGS;
use crate::module::Module;
use crate::rules::RuleTable;
use crate::types::{ModuleTag, ModuleType, Substrate};

/// Resolves the ranked chemical tags of a module.
///
/// The highest-priority rule whose annotations are a subset of the module's
/// and whose type equals the module's is applied to every substrate, keeping
/// the substrate rank. Known artifact tags are dropped. A PKS module left
/// without tags falls back to the malonyl rendering of the chosen formula.
/// Without a matching rule the module gets no tags.
pub fn resolve_tags(module: &Module, rules: &RuleTable) -> Vec<ModuleTag> {
    let module_type = module.module_type();
    let Some(rule) = rules.best_match(&module.annotations, module_type) else {
        return Vec::new();
    };

    let mut tags: Vec<ModuleTag> = module
        .substrates
        .iter()
        .map(|substrate| ModuleTag {
            tag: rule.format(&substrate.label),
            rank: substrate.rank,
        })
        .filter(|tag| !EXCLUDED_TAGS.contains(&tag.tag.as_str()))
        .collect();

    // DH is sometimes paired with substrates the rule table cannot render
    if tags.is_empty() && module_type == ModuleType::Pks {
        let malonyl = Substrate::malonyl();
        tags.push(ModuleTag {
            tag: rule.format(&malonyl.label),
            rank: malonyl.rank,
        });
    }

    tags
}
