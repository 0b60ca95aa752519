//! Separator tables for language-aware recursive splitting.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use textsplit_core::SplitError;

/// Separators used when no language is given.
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

/// Languages with a built-in separator table.
///
/// Every table lists the most structural separators first and ends with
/// `""`, so recursive splitting always terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Go,
    Java,
    Js,
    Php,
    Proto,
    Python,
    Rst,
    Ruby,
    Rust,
    Scala,
    Swift,
    Markdown,
    Latex,
    Html,
    Sol,
}

impl Language {
    /// All supported languages.
    pub const ALL: [Language; 16] = [
        Self::Cpp,
        Self::Go,
        Self::Java,
        Self::Js,
        Self::Php,
        Self::Proto,
        Self::Python,
        Self::Rst,
        Self::Ruby,
        Self::Rust,
        Self::Scala,
        Self::Swift,
        Self::Markdown,
        Self::Latex,
        Self::Html,
        Self::Sol,
    ];

    /// The separator table, most structural first.
    pub fn separators(&self) -> &'static [&'static str] {
        match self {
            Self::Cpp => &[
                "\nclass ", "\nvoid ", "\nint ", "\nfloat ", "\ndouble ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Go => &[
                "\nfunc ", "\nvar ", "\nconst ", "\ntype ", "\nif ", "\nfor ", "\nswitch ",
                "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Java => &[
                "\nclass ", "\npublic ", "\nprotected ", "\nprivate ", "\nstatic ", "\nif ",
                "\nfor ", "\nwhile ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Js => &[
                "\nfunction ", "\nconst ", "\nlet ", "\nvar ", "\nclass ", "\nif ", "\nfor ",
                "\nwhile ", "\nswitch ", "\ncase ", "\ndefault ", "\n\n", "\n", " ", "",
            ],
            Self::Php => &[
                "\nfunction ", "\nclass ", "\nif ", "\nforeach ", "\nwhile ", "\ndo ",
                "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Proto => &[
                "\nmessage ", "\nservice ", "\nenum ", "\noption ", "\nimport ", "\nsyntax ",
                "\n\n", "\n", " ", "",
            ],
            Self::Python => &["\nclass ", "\ndef ", "\n\tdef ", "\n\n", "\n", " ", ""],
            Self::Rst => &["\n===\n", "\n---\n", "\n***\n", "\n.. ", "\n\n", "\n", " ", ""],
            Self::Ruby => &[
                "\ndef ", "\nclass ", "\nif ", "\nunless ", "\nwhile ", "\nfor ", "\ndo ",
                "\nbegin ", "\nrescue ", "\n\n", "\n", " ", "",
            ],
            Self::Rust => &[
                "\nfn ", "\nconst ", "\nlet ", "\nif ", "\nwhile ", "\nfor ", "\nloop ",
                "\nmatch ", "\nconst ", "\n\n", "\n", " ", "",
            ],
            Self::Scala => &[
                "\nclass ", "\nobject ", "\ndef ", "\nval ", "\nvar ", "\nif ", "\nfor ",
                "\nwhile ", "\nmatch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Swift => &[
                "\nfunc ", "\nclass ", "\nstruct ", "\nenum ", "\nif ", "\nfor ", "\nwhile ",
                "\ndo ", "\nswitch ", "\ncase ", "\n\n", "\n", " ", "",
            ],
            Self::Markdown => &[
                "\n## ", "\n### ", "\n#### ", "\n##### ", "\n###### ", "```\n\n",
                "\n\n***\n\n", "\n\n---\n\n", "\n\n___\n\n", "\n\n", "\n", " ", "",
            ],
            Self::Latex => &[
                "\n\\chapter{", "\n\\section{", "\n\\subsection{", "\n\\subsubsection{",
                "\n\\begin{enumerate}", "\n\\begin{itemize}", "\n\\begin{description}",
                "\n\\begin{list}", "\n\\begin{quote}", "\n\\begin{quotation}",
                "\n\\begin{verse}", "\n\\begin{verbatim}", "\n\\begin{align}", "$$", "$",
                "\n\n", "\n", " ", "",
            ],
            Self::Html => &[
                "<body>", "<div>", "<p>", "<br>", "<li>", "<h1>", "<h2>", "<h3>", "<h4>",
                "<h5>", "<h6>", "<span>", "<table>", "<tr>", "<td>", "<th>", "<ul>", "<ol>",
                "<header>", "<footer>", "<nav>", "<head>", "<style>", "<script>", "<meta>",
                "<title>", " ", "",
            ],
            Self::Sol => &[
                "\npragma ", "\nusing ", "\ncontract ", "\ninterface ", "\nlibrary ",
                "\nconstructor ", "\ntype ", "\nfunction ", "\nevent ", "\nmodifier ",
                "\nerror ", "\nstruct ", "\nenum ", "\nif ", "\nfor ", "\nwhile ",
                "\ndo while ", "\nassembly ", "\n\n", "\n", " ", "",
            ],
        }
    }

    /// Tag accepted by [`FromStr`].
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::Go => "go",
            Self::Java => "java",
            Self::Js => "js",
            Self::Php => "php",
            Self::Proto => "proto",
            Self::Python => "python",
            Self::Rst => "rst",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Scala => "scala",
            Self::Swift => "swift",
            Self::Markdown => "markdown",
            Self::Latex => "latex",
            Self::Html => "html",
            Self::Sol => "sol",
        }
    }

    /// Detect language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "c" | "h" => Some(Self::Cpp),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => Some(Self::Js),
            "php" => Some(Self::Php),
            "proto" => Some(Self::Proto),
            "py" | "pyi" => Some(Self::Python),
            "rst" => Some(Self::Rst),
            "rb" => Some(Self::Ruby),
            "rs" => Some(Self::Rust),
            "scala" | "sc" => Some(Self::Scala),
            "swift" => Some(Self::Swift),
            "md" | "markdown" => Some(Self::Markdown),
            "tex" => Some(Self::Latex),
            "html" | "htm" => Some(Self::Html),
            "sol" => Some(Self::Sol),
            _ => None,
        }
    }

    /// Detect language from file path.
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

impl FromStr for Language {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|lang| lang.tag() == tag)
            .ok_or_else(|| SplitError::unsupported_language(s))
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
