//! Candidate-file filtering.
//!
//! Two fixed sets decide whether a file is searched: an allow-list of
//! text-like extensions and a set of directory names (build output, caches,
//! VCS metadata, package managers, editor state) whose subtrees are skipped.
//! Both sets are stored lowercase and compared case-insensitively.
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Component, Path};

#[rustfmt::skip]
const TEXT_EXTENSIONS: &[&str] = &[
    "ada", "adb", "ads", "applescript", "as", "asc", "ascii", "ascx", "asm", "asmx", "asp",
    "aspx", "atom", "au3", "awk", "bas", "bash", "bashrc", "bat", "bbcolors", "bcp", "bdsgroup",
    "bdsproj", "bib", "bowerrc", "c", "cbl", "cc", "cfc", "cfg", "cfm", "cfml", "cgi", "cjs",
    "clj", "cljs", "cls", "cmake", "cmd", "cnf", "cob", "code-snippets", "coffee", "coffeekup",
    "conf", "cp", "cpp", "cpt", "cpy", "crt", "cs", "csh", "cson", "csproj", "csr", "css",
    "csslintrc", "csv", "ctl", "cts", "curlrc", "cxx", "d", "dart", "dfm", "diff", "dof", "dpk",
    "dpr", "dproj", "dtd", "eco", "editorconfig", "ejs", "el", "elm", "emacs", "eml", "ent",
    "erb", "erl", "eslintignore", "eslintrc", "ex", "exs", "f", "f03", "f77", "f90", "f95",
    "fish", "for", "fpp", "frm", "fs", "fsproj", "fsx", "ftn", "gemrc", "gemspec",
    "gitattributes", "gitconfig", "gitignore", "gitkeep", "gitmodules", "go", "gpp", "gradle",
    "graphql", "groovy", "groupproj", "grunit", "gtmpl", "gvimrc", "h", "haml", "hbs", "hgignore",
    "hh", "hpp", "hrl", "hs", "hta", "htaccess", "htc", "htm", "html", "htpasswd", "hxx", "iced",
    "iml", "inc", "inf", "info", "ini", "ino", "int", "irbrc", "itcl", "itermcolors", "itk",
    "jade", "java", "jhtm", "jhtml", "js", "jscsrc", "jshintignore", "jshintrc", "json", "json5",
    "jsonld", "jsp", "jspx", "jsx", "ksh", "less", "lhs", "lisp", "log", "ls", "lsp", "lua", "m",
    "m4", "mak", "map", "markdown", "master", "md", "mdown", "mdwn", "mdx", "metadata", "mht",
    "mhtml", "mjs", "mk", "mkd", "mkdn", "mkdown", "ml", "mli", "mm", "mts", "mxml", "nfm", "nfo",
    "noon", "npmignore", "npmrc", "nuspec", "nvmrc", "ops", "pas", "pasm", "patch", "pbxproj",
    "pch", "pem", "pg", "php", "php3", "php4", "php5", "phpt", "phtml", "pir", "pl", "pm", "pmc",
    "pod", "pot", "prettierrc", "properties", "props", "pt", "pug", "purs", "py", "pyx", "r",
    "rake", "rb", "rbw", "rc", "rdoc", "rdoc_options", "resx", "rexx", "rhtml", "rjs", "rlib",
    "ron", "rs", "rss", "rst", "rtf", "rvmrc", "rxml", "s", "sass", "scala", "scm", "scss",
    "seestyle", "sh", "shtml", "sln", "sls", "spec", "sql", "sqlite", "sqlproj", "srt", "ss",
    "sss", "st", "strings", "sty", "styl", "stylus", "sub", "sublime-build", "sublime-commands",
    "sublime-completions", "sublime-keymap", "sublime-macro", "sublime-menu", "sublime-project",
    "sublime-settings", "sublime-workspace", "sv", "svc", "svg", "swift", "t", "tcl", "tcsh",
    "terminal", "tex", "text", "textile", "tg", "tk", "tmlanguage", "tmpl", "tmtheme", "tpl",
    "ts", "tsv", "tsx", "tt", "tt2", "ttml", "twig", "txt", "v", "vb", "vbproj", "vbs", "vcproj",
    "vcxproj", "vh", "vhd", "vhdl", "vim", "viminfo", "vimrc", "vm", "vue", "webapp",
    "webmanifest", "wsc", "x-php", "xaml", "xht", "xhtml", "xml", "xs", "xsd", "xsl", "xslt", "y",
    "yaml", "yml", "zsh", "zshrc",
];

const EXCLUDED_DIRS: &[&str] = &[
    // dependency caches and package managers
    "node_modules", "bower_components", "site-packages", ".npm", ".pub-cache",
    // python tooling
    "__pycache__", ".pytest_cache", ".tox", "venv", ".venv", "env", "envs", "pyenv",
    // version control
    ".git", ".hg", ".svn",
    // build output
    "dist", "build", "out", "target", "bin", "obj", "coverage", "mod",
    // editors and IDEs
    ".idea", ".vscode", ".cursor", ".vim", ".angular",
    // caches and logs
    ".cache", "cache", "caches", ".cache-loader", ".parcel-cache", "logs", "log",
    // toolchains and user-level state
    "toolchains", "toolchain", ".rustup", ".local", ".oh-my-zsh",
    "application support", "library", "applications", "group containers",
];

static TEXT_EXTENSION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| TEXT_EXTENSIONS.iter().copied().collect());

static EXCLUDED_DIR_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| EXCLUDED_DIRS.iter().copied().collect());

/// Checks if the file's extension is on the text allow-list.
///
/// Files without an extension (including dotfiles such as `.gitignore`) are
/// never on the list.
pub fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_EXTENSION_SET.contains(ext.to_lowercase().as_str()))
}

/// Checks if a single path segment names an excluded directory
pub fn is_excluded_name(name: &str) -> bool {
    EXCLUDED_DIR_SET.contains(name.to_lowercase().as_str())
}

/// Checks if any segment of `path`, the root's ancestors included, names an
/// excluded directory
pub fn has_excluded_segment(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(segment) => segment.to_str().is_some_and(is_excluded_name),
        _ => false,
    })
}

/// Determines if a discovered file should be searched
pub fn should_include_file(path: &Path) -> bool {
    has_text_extension(path) && !has_excluded_segment(path)
}
