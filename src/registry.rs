// src/registry.rs
use std::path::Path;

/// Extension → language label table. Kept sorted by extension so lookups can
/// binary-search; entries are lowercase with the leading dot.
const LANGUAGES: &[(&str, &str)] = &[
    (".c", "C"),
    (".cc", "C++"),
    (".cpp", "C++"),
    (".cs", "C#"),
    (".css", "CSS"),
    (".cxx", "C++"),
    (".dart", "Dart"),
    (".go", "Go"),
    (".h", "C/C++ Header"),
    (".hpp", "C++ Header"),
    (".html", "HTML"),
    (".hx", "Haxe"),
    (".java", "Java"),
    (".js", "JavaScript"),
    (".json", "JSON"),
    (".jsx", "JSX"),
    (".kt", "Kotlin"),
    (".less", "Less"),
    (".lua", "Lua"),
    (".m", "Objective-C"),
    (".mm", "Objective-C++"),
    (".nim", "Nim"),
    (".php", "PHP"),
    (".pl", "Perl"),
    (".ps1", "PowerShell"),
    (".py", "Python"),
    (".r", "R"),
    (".rb", "Ruby"),
    (".rs", "Rust"),
    (".sass", "Sass"),
    (".scala", "Scala"),
    (".scss", "SCSS"),
    (".sh", "Shell"),
    (".sql", "SQL"),
    (".swift", "Swift"),
    (".ts", "TypeScript"),
    (".tsx", "TSX"),
    (".vue", "Vue"),
    (".xml", "XML"),
    (".yaml", "YAML"),
    (".yml", "YAML"),
    (".zig", "Zig"),
];

/// Look up the language label for a normalized extension (e.g. ".rs").
pub fn language_for(ext: &str) -> Option<&'static str> {
    LANGUAGES
        .binary_search_by_key(&ext, |&(e, _)| e)
        .ok()
        .map(|i| LANGUAGES[i].1)
}

pub fn is_supported(ext: &str) -> bool {
    language_for(ext).is_some()
}

/// Normalized extension of a path: lowercased, with the leading dot.
/// Returns `None` for files without an extension.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
}
