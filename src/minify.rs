//! In-process minification of concatenated bundle output.
//!
//! JavaScript goes through oxc (parse, compress + mangle, codegen) and CSS
//! through lightningcss. Failures carry the parser diagnostics so callers
//! can report them apart from filesystem errors.

use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::error::MinifyError;
use crate::kind::AssetKind;

/// Minify a buffer according to its asset kind.
pub fn minify(kind: AssetKind, source: &str) -> Result<String, MinifyError> {
    match kind {
        AssetKind::Script => minify_js(source),
        AssetKind::Stylesheet => minify_css(source),
    }
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, SourceType::cjs()).parse();
    if !parsed.errors.is_empty() {
        let detail = parsed
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(MinifyError::Js(detail));
    }

    let mut program = parsed.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let minified = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, MinifyError> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| MinifyError::Css(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| MinifyError::Css(e.to_string()))?;
    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_js_shrinks() {
        let source = "var answer = 40 + 2;\nconsole.log( answer );\n";
        let code = minify_js(source).unwrap();
        assert!(code.len() < source.len());
        assert!(code.contains("console.log"));
    }

    #[test]
    fn test_minify_js_invalid_source() {
        let err = minify_js("function {").unwrap_err();
        assert!(matches!(err, MinifyError::Js(_)));
    }

    #[test]
    fn test_minify_css_shrinks() {
        let source = "body {\n    color: #ff0000;\n    margin: 0px;\n}\n";
        let code = minify_css(source).unwrap();
        assert!(code.len() < source.len());
        assert!(code.contains("body"));
    }

    #[test]
    fn test_minify_css_invalid_source() {
        let err = minify_css("}{ not stylesheet").unwrap_err();
        assert!(matches!(err, MinifyError::Css(_)));
    }

    #[test]
    fn test_minify_dispatch() {
        assert!(minify(AssetKind::Script, "var a = 1;").is_ok());
        assert!(minify(AssetKind::Stylesheet, "a { color: red }").is_ok());
    }
}
