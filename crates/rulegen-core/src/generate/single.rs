//! Everything in one `rules.mdc`

use super::{Document, GenerationContext, GenerationStrategy, RULES_FILE_NAME, RULES_LABEL};

pub struct SingleFileStrategy;

impl GenerationStrategy for SingleFileStrategy {
    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Document> {
        if ctx.selected.is_empty() {
            return vec![ctx.placeholder_document()];
        }

        let mut markdown = ctx.project.header();
        for (layer, stacks) in ctx.grouping.stacks_by_layer.iter() {
            markdown.push_str(&ctx.layer_heading(layer));
            for stack in stacks {
                markdown.push_str(&ctx.stack_heading(stack));
                for library in ctx.grouping.libraries_by_stack.get(stack) {
                    markdown.push_str(&ctx.library_section(library));
                }
            }
        }

        vec![Document::new(markdown, RULES_LABEL, RULES_FILE_NAME)]
    }
}
