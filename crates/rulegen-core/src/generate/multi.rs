//! Header file plus one file per (layer, stack, library) triple

use super::{
    slugify, Document, GenerationContext, GenerationStrategy, FILE_EXTENSION, PROJECT_FILE_NAME,
    PROJECT_LABEL,
};
use std::collections::HashSet;

/// `<slug>.mdc`, or `<slug>-2.mdc`, `<slug>-3.mdc`, ... when an earlier document took the name
fn unique_file_name(slug: &str, taken: &mut HashSet<String>) -> String {
    let mut file_name = format!("{}.{}", slug, FILE_EXTENSION);
    let mut suffix = 2;
    while taken.contains(&file_name) {
        file_name = format!("{}-{}.{}", slug, suffix, FILE_EXTENSION);
        suffix += 1;
    }
    taken.insert(file_name.clone());
    file_name
}

pub struct MultiFileStrategy;

impl GenerationStrategy for MultiFileStrategy {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Document> {
        if ctx.selected.is_empty() {
            return vec![ctx.placeholder_document()];
        }

        let mut documents = vec![Document::new(
            ctx.project.header(),
            PROJECT_LABEL,
            PROJECT_FILE_NAME,
        )];
        let mut taken: HashSet<String> = HashSet::from([PROJECT_FILE_NAME.to_string()]);

        // A library listed under two stacks is emitted once per stack
        for (layer, stack, library) in ctx.grouping.triples() {
            let layer_name = ctx.taxonomy.layer_name(layer);
            let stack_name = ctx.taxonomy.stack_name(stack);

            let mut markdown = ctx.layer_heading(layer);
            markdown.push_str(&ctx.stack_heading(stack));
            markdown.push_str(&ctx.library_section(library));

            let label = format!("{} - {} - {}", layer_name, stack_name, library);
            // Distinct names can share a slug ("C++" and "C")
            let slug = slugify(&format!("{}-{}-{}", layer_name, stack_name, library));
            let file_name = unique_file_name(&slug, &mut taken);
            documents.push(Document::new(markdown, label, file_name));
        }

        documents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{ProjectInfo, EMPTY_SELECTION_PLACEHOLDER};
    use crate::grouping::Grouping;
    use crate::rules::RuleCatalog;
    use crate::taxonomy::{Layer, LibraryId, Stack, Taxonomy};
    use std::collections::HashMap;

    fn fixture() -> (Taxonomy, RuleCatalog) {
        let taxonomy = Taxonomy::new(
            vec![
                Layer {
                    id: "BACKEND".into(),
                    name: "Backend".to_string(),
                    stacks: vec!["NODE".into()],
                },
                Layer {
                    id: "DATABASE".into(),
                    name: "Database".to_string(),
                    stacks: vec!["SQL".into()],
                },
            ],
            vec![
                Stack {
                    id: "NODE".into(),
                    name: "Node.js".to_string(),
                    libraries: vec!["EXPRESS".into(), "PRISMA".into()],
                },
                Stack {
                    id: "SQL".into(),
                    name: "SQL".to_string(),
                    libraries: vec!["POSTGRES".into(), "PRISMA".into()],
                },
            ],
        );
        let mut rules = HashMap::new();
        rules.insert(
            LibraryId::from("PRISMA"),
            vec!["Keep the schema in {{schema_path}}".to_string()],
        );
        (taxonomy, RuleCatalog::new(rules))
    }

    fn run(selected: &[LibraryId]) -> Vec<Document> {
        let (taxonomy, catalog) = fixture();
        let project = ProjectInfo::new("Api", "Backend service");
        let grouping = Grouping::from_selection(&taxonomy, selected);
        let ctx = GenerationContext {
            project: &project,
            selected,
            grouping: &grouping,
            taxonomy: &taxonomy,
            catalog: &catalog,
        };
        MultiFileStrategy.generate(&ctx)
    }

    #[test]
    fn test_header_document_comes_first() {
        let docs = run(&["EXPRESS".into()]);
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].file_name, "project.mdc");
        assert_eq!(docs[0].label, "Project");
        assert_eq!(docs[0].markdown, "# AI Rules for Api\n\nBackend service\n\n");
        assert!(!docs[0].markdown.contains("####"));
    }

    #[test]
    fn test_library_document_body() {
        let docs = run(&["EXPRESS".into()]);
        assert_eq!(docs[1].label, "Backend - Node.js - EXPRESS");
        assert_eq!(docs[1].file_name, "backend-nodejs-express.mdc");
        assert_eq!(
            docs[1].markdown,
            "## Backend\n\n### Guidelines for Node.js\n\n#### EXPRESS\n\n\
             - Use EXPRESS according to best practices\n\n"
        );
    }

    #[test]
    fn test_shared_library_fans_out_per_stack() {
        let docs = run(&["PRISMA".into()]);
        assert_eq!(docs.len(), 3);

        let labels: Vec<_> = docs.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Project", "Backend - Node.js - PRISMA", "Database - SQL - PRISMA"]
        );
        assert_ne!(docs[1].file_name, docs[2].file_name);
        assert!(docs[2].markdown.starts_with("## Database\n\n### Guidelines for SQL"));
        assert!(docs[2].markdown.contains("- Keep the schema in {{schema_path}}\n"));
    }

    #[test]
    fn test_colliding_slugs_get_numbered_file_names() {
        let taxonomy = Taxonomy::new(
            vec![Layer {
                id: "BACKEND".into(),
                name: "Backend".to_string(),
                stacks: vec!["CPP".into(), "C".into()],
            }],
            vec![
                Stack {
                    id: "CPP".into(),
                    name: "C++".to_string(),
                    libraries: vec!["CLANG_TIDY".into()],
                },
                Stack {
                    id: "C".into(),
                    name: "C".to_string(),
                    libraries: vec!["CLANG_TIDY".into()],
                },
            ],
        );
        let catalog = RuleCatalog::new(HashMap::new());
        let project = ProjectInfo::new("Native", "");
        let selected: Vec<LibraryId> = vec!["CLANG_TIDY".into()];
        let grouping = Grouping::from_selection(&taxonomy, &selected);
        let ctx = GenerationContext {
            project: &project,
            selected: &selected,
            grouping: &grouping,
            taxonomy: &taxonomy,
            catalog: &catalog,
        };

        let docs = MultiFileStrategy.generate(&ctx);
        let names: Vec<_> = docs.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["project.mdc", "backend-c-clang_tidy.mdc", "backend-c-clang_tidy-2.mdc"]
        );
        assert_eq!(docs[1].label, "Backend - C++ - CLANG_TIDY");
        assert_eq!(docs[2].label, "Backend - C - CLANG_TIDY");
    }

    #[test]
    fn test_unique_file_name_skips_taken_names() {
        let mut taken = HashSet::from(["a.mdc".to_string(), "a-2.mdc".to_string()]);
        assert_eq!(unique_file_name("a", &mut taken), "a-3.mdc");
        assert_eq!(unique_file_name("b", &mut taken), "b.mdc");
        assert!(taken.contains("a-3.mdc"));
    }

    #[test]
    fn test_empty_selection_returns_placeholder_only() {
        let docs = run(&[]);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].file_name, "project.mdc");
        assert!(docs[0].markdown.ends_with(EMPTY_SELECTION_PLACEHOLDER));
    }
}
