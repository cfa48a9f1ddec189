use crate::{ClassType, Type, TypeEnv};

/// Render `ty` using Java source syntax with binary class names.
///
/// The output is stable for a given store and is used both in diagnostics and as a deterministic
/// sort key. Unknown ids render as `<class#N>` / `<tv#N>` instead of panicking.
pub fn format_type(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Class(ClassType { def, args }) => {
            match env.class(*def) {
                Some(class_def) => out.push_str(&class_def.name),
                None => out.push_str(&format!("<class#{}>", def.to_raw())),
            }
            if !args.is_empty() {
                out.push('<');
                write_list(env, args, ", ", out);
                out.push('>');
            }
        }
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(tp) => out.push_str(&tp.name),
            None => out.push_str(&format!("<tv#{}>", id.to_raw())),
        },
        Type::Wildcard(w) => {
            out.push('?');
            if !w.upper_bounds.is_empty() {
                out.push_str(" extends ");
                write_list(env, &w.upper_bounds, " & ", out);
            }
            if !w.lower_bounds.is_empty() {
                out.push_str(" super ");
                write_list(env, &w.lower_bounds, " & ", out);
            }
        }
        Type::Array(elem) => {
            write_type(env, elem, out);
            out.push_str("[]");
        }
        Type::Primitive(p) => out.push_str(p.keyword()),
        Type::Null => out.push_str("null"),
    }
}

fn write_list(env: &dyn TypeEnv, types: &[Type], sep: &str, out: &mut String) {
    for (idx, ty) in types.iter().enumerate() {
        if idx > 0 {
            out.push_str(sep);
        }
        write_type(env, ty, out);
    }
}
