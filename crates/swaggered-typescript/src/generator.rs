use std::rc::Rc;

use swaggered_core::config::GenerateOptions;
use swaggered_core::ir::IrSpec;
use swaggered_core::transform::name_normalizer::function_name;
use swaggered_core::{CodeGenerator, FunctionSignature, GenerateResult, GeneratedItem};

use crate::adapter::Compiled;
use crate::compiler::RenderOptions;
use crate::emitters::function::{FunctionSource, FunctionStyle, emit_function};
use crate::error::GeneratorError;
use crate::synthesize::{RunContext, synthesize};

/// Source of the fetch-based `request` helper the functions call.
pub const REQUEST_HELPER: &str = include_str!("../templates/request.ts");

/// TypeScript request-function generator.
pub struct TypeScriptGenerator;

impl CodeGenerator for TypeScriptGenerator {
    type Error = GeneratorError;

    fn generate(
        &self,
        ir: &IrSpec,
        options: &GenerateOptions,
    ) -> Result<GenerateResult, Self::Error> {
        let render = RenderOptions {
            prefix: options.interface_prefix.clone(),
            use_interface: options.use_interface,
            export: options.export,
        };
        let style = FunctionStyle {
            export: options.export,
            return_type: options.return_type,
            member: None,
        };

        let mut ctx = RunContext::default();
        let mut list = Vec::with_capacity(ir.operations.len());

        for op in &ir.operations {
            let types = synthesize(op, &mut ctx, &render)?;
            let signature = FunctionSignature {
                function_name: function_name(&op.name),
                params_type: types.params.as_ref().map(|c| c.name.clone()),
                params_in_path: types.params_in_path,
                body_type: types.body.as_ref().map(|c| c.name.clone()),
                response_generic: types.response_generic.clone(),
            };

            let code = if options.types_only {
                None
            } else {
                let source = FunctionSource {
                    signature: &signature,
                    path: &op.path,
                    method: op.method,
                    description: &op.description,
                    summary: &op.name,
                    deprecated: op.deprecated,
                };
                Some(emit_function(&source, &style)?)
            };

            list.push(GeneratedItem {
                path: op.path.clone(),
                method: op.method,
                request_parameters_type: declarations(types.params),
                request_body_type: declarations(types.body),
                response_type: declarations(types.response),
                generic_resp: ctx.envelope.as_ref().map(|e| Rc::clone(&e.declaration)),
                summary: op.name.clone(),
                description: op.description.clone(),
                group: op.group.clone(),
                deprecated: op.deprecated,
                code,
                signature,
            });
        }

        Ok(GenerateResult {
            list,
            total: ir.total,
            code_before: Some(REQUEST_HELPER.to_string()),
            base_path: ir.base_path.clone(),
            generic_resp: ctx.envelope.map(|e| e.declaration),
        })
    }
}

fn declarations(compiled: Option<Compiled>) -> Vec<String> {
    compiled.map(|c| c.declarations).unwrap_or_default()
}
