//! Per-file lowering: the `FileDescriptorProto` mapping.

use tracing::warn;

use crate::ast::{ExtendEntry, FileItem, Method, ProtoFile, Reference, Service, ServiceEntry};
use crate::descriptor::{
    FileDescriptorProto, FileOptions, MethodDescriptorProto, ServiceDescriptorProto,
    ServiceOptions,
};
use crate::error::LowerError;

use super::field::lower_field;
use super::message::{lower_enum, lower_message};
use super::options::lower_option;
use super::Context;

pub(super) fn lower_file(file: &ProtoFile) -> Result<FileDescriptorProto, LowerError> {
    // Duplicate syntax/package entries are fatal before anything else.
    let syntax_count = file
        .items
        .iter()
        .filter(|item| matches!(item, FileItem::Syntax(_)))
        .count();
    let package_count = file
        .items
        .iter()
        .filter(|item| matches!(item, FileItem::Package(_)))
        .count();
    for (count, what) in [(syntax_count, "syntax"), (package_count, "package")] {
        if count > 1 {
            return Err(LowerError::DuplicateDeclaration {
                file: file.name.clone(),
                what,
            });
        }
    }

    let package = file.package().cloned();
    let ctx = Context {
        file: &file.name,
        proto3: file.syntax() == Some("proto3"),
        package: package.as_ref(),
    };

    let mut out = FileDescriptorProto {
        name: Some(file.name.clone()),
        package: package.as_ref().map(|name| name.to_string()),
        syntax: file.syntax().map(str::to_string),
        ..Default::default()
    };
    let mut uninterpreted = Vec::new();

    for item in &file.items {
        match item {
            FileItem::Syntax(_) | FileItem::Package(_) | FileItem::Empty(_) => {}
            FileItem::Import(import) => {
                let index = out.dependency.len() as i32;
                out.dependency.push(import.path.clone());
                if import.public {
                    out.public_dependency.push(index);
                }
                if import.weak {
                    out.weak_dependency.push(index);
                }
            }
            FileItem::Option(decl) => {
                uninterpreted.push(lower_option(&file.name, decl)?);
            }
            FileItem::Message(message) => {
                let scope = match &package {
                    Some(package) => format!("{}.{}", package, message.name),
                    None => message.name.clone(),
                };
                out.message_type.push(lower_message(&ctx, &scope, message)?);
            }
            FileItem::Enum(decl) => {
                out.enum_type.push(lower_enum(&ctx, decl)?);
            }
            FileItem::Service(service) => {
                out.service.push(lower_service(&ctx, service)?);
            }
            FileItem::Extend(extend) => {
                let context = format!("{}: extend {}", file.name, extend.extendee);
                for entry in &extend.entries {
                    match entry {
                        ExtendEntry::Field(field) => {
                            out.extension.push(lower_field(
                                &ctx,
                                &context,
                                field,
                                None,
                                Some(&extend.extendee),
                            )?);
                        }
                        ExtendEntry::Group(group) => {
                            warn!(
                                group = group.name.as_str(),
                                context = context.as_str(),
                                "skipping group extension; groups are not lowered"
                            );
                        }
                        ExtendEntry::Empty(_) => {}
                    }
                }
            }
        }
    }

    out.options = FileOptions::from_uninterpreted(uninterpreted);
    Ok(out)
}

fn lower_service(ctx: &Context, service: &Service) -> Result<ServiceDescriptorProto, LowerError> {
    let context = format!("{}: service {}", ctx.file, service.name);
    let mut out = ServiceDescriptorProto {
        name: Some(service.name.clone()),
        ..Default::default()
    };
    let mut uninterpreted = Vec::new();

    for entry in &service.entries {
        match entry {
            ServiceEntry::Method(method) => out.method.push(lower_method(ctx, &context, method)?),
            ServiceEntry::Option(decl) => uninterpreted.push(lower_option(&context, decl)?),
            ServiceEntry::Empty(_) => {}
        }
    }

    out.options = ServiceOptions::from_uninterpreted(uninterpreted);
    Ok(out)
}

fn lower_method(
    ctx: &Context,
    context: &str,
    method: &Method,
) -> Result<MethodDescriptorProto, LowerError> {
    let context = format!("{}: rpc {}", context, method.name);
    let mut uninterpreted = Vec::new();
    for decl in &method.options {
        uninterpreted.push(lower_option(&context, decl)?);
    }
    Ok(MethodDescriptorProto {
        name: Some(method.name.clone()),
        input_type: Some(qualify(ctx, &method.request)),
        output_type: Some(qualify(ctx, &method.response)),
        options: crate::descriptor::MethodOptions::from_uninterpreted(uninterpreted),
        client_streaming: method.streaming_request.then_some(true),
        server_streaming: method.streaming_response.then_some(true),
    })
}

/// Method types are emitted fully qualified: an explicit leading dot
/// wins; otherwise the name is anchored under the enclosing package
/// when there is one, or at the root when there is not.
fn qualify(ctx: &Context, reference: &Reference) -> String {
    if reference.leading_dot {
        reference.to_string()
    } else {
        match ctx.package {
            Some(package) => format!(".{}.{}", package, reference.name),
            None => format!(".{}", reference.name),
        }
    }
}
