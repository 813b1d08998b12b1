//! Known keyword names for Robot Framework highlighting.

use crate::model::LibraryInfo;
use std::collections::HashSet;

/// Keywords of the Robot Framework standard libraries that commonly appear
/// in usage examples.
pub const STANDARD_LIBRARY: &[&str] = &[
    // BuiltIn
    "Call Method",
    "Catenate",
    "Comment",
    "Continue For Loop",
    "Continue For Loop If",
    "Convert To Binary",
    "Convert To Boolean",
    "Convert To Bytes",
    "Convert To Hex",
    "Convert To Integer",
    "Convert To Number",
    "Convert To Octal",
    "Convert To String",
    "Create Dictionary",
    "Create List",
    "Evaluate",
    "Exit For Loop",
    "Exit For Loop If",
    "Fail",
    "Fatal Error",
    "Get Count",
    "Get Length",
    "Get Library Instance",
    "Get Time",
    "Get Variable Value",
    "Get Variables",
    "Import Library",
    "Import Resource",
    "Import Variables",
    "Keyword Should Exist",
    "Length Should Be",
    "Log",
    "Log Many",
    "Log To Console",
    "Log Variables",
    "No Operation",
    "Pass Execution",
    "Pass Execution If",
    "Repeat Keyword",
    "Replace Variables",
    "Return From Keyword",
    "Return From Keyword If",
    "Run Keyword",
    "Run Keyword And Continue On Failure",
    "Run Keyword And Expect Error",
    "Run Keyword And Ignore Error",
    "Run Keyword And Return",
    "Run Keyword And Return If",
    "Run Keyword And Return Status",
    "Run Keyword And Warn On Failure",
    "Run Keyword If",
    "Run Keyword If All Tests Passed",
    "Run Keyword If Any Tests Failed",
    "Run Keyword If Test Failed",
    "Run Keyword If Test Passed",
    "Run Keyword If Timeout Occurred",
    "Run Keyword Unless",
    "Run Keywords",
    "Set Global Variable",
    "Set Library Search Order",
    "Set Local Variable",
    "Set Log Level",
    "Set Suite Documentation",
    "Set Suite Metadata",
    "Set Suite Variable",
    "Set Tags",
    "Set Task Variable",
    "Set Test Documentation",
    "Set Test Message",
    "Set Test Variable",
    "Set Variable",
    "Set Variable If",
    "Should Be Empty",
    "Should Be Equal",
    "Should Be Equal As Integers",
    "Should Be Equal As Numbers",
    "Should Be Equal As Strings",
    "Should Be True",
    "Should Contain",
    "Should Contain Any",
    "Should Contain X Times",
    "Should End With",
    "Should Match",
    "Should Match Regexp",
    "Should Not Be Empty",
    "Should Not Be Equal",
    "Should Not Be Equal As Integers",
    "Should Not Be Equal As Numbers",
    "Should Not Be Equal As Strings",
    "Should Not Be True",
    "Should Not Contain",
    "Should Not Contain Any",
    "Should Not End With",
    "Should Not Match",
    "Should Not Match Regexp",
    "Should Not Start With",
    "Should Start With",
    "Skip",
    "Skip If",
    "Sleep",
    "Variable Should Exist",
    "Variable Should Not Exist",
    "Wait Until Keyword Succeeds",
    // Collections
    "Append To List",
    "Combine Lists",
    "Copy Dictionary",
    "Copy List",
    "Count Values In List",
    "Dictionaries Should Be Equal",
    "Dictionary Should Contain Key",
    "Dictionary Should Contain Value",
    "Get Dictionary Keys",
    "Get Dictionary Values",
    "Get From Dictionary",
    "Get From List",
    "Get Index From List",
    "Insert Into List",
    "List Should Contain Value",
    "List Should Not Contain Value",
    "Lists Should Be Equal",
    "Remove From Dictionary",
    "Remove From List",
    "Remove Values From List",
    "Set To Dictionary",
    "Sort List",
    // DateTime
    "Add Time To Date",
    "Convert Date",
    "Convert Time",
    "Get Current Date",
    "Subtract Date From Date",
    // OperatingSystem
    "Append To File",
    "Copy File",
    "Create Directory",
    "Create File",
    "Directory Should Exist",
    "File Should Exist",
    "File Should Not Exist",
    "Get Environment Variable",
    "Get File",
    "List Directory",
    "Move File",
    "Remove Directory",
    "Remove File",
    "Run",
    "Run And Return Rc",
    "Set Environment Variable",
    // Process
    "Get Process Id",
    "Get Process Result",
    "Is Process Running",
    "Process Should Be Running",
    "Process Should Be Stopped",
    "Run Process",
    "Start Process",
    "Terminate All Processes",
    "Terminate Process",
    "Wait For Process",
    // String
    "Convert To Lower Case",
    "Convert To Title Case",
    "Convert To Upper Case",
    "Fetch From Left",
    "Fetch From Right",
    "Generate Random String",
    "Get Line",
    "Get Line Count",
    "Get Lines Containing String",
    "Get Regexp Matches",
    "Get Substring",
    "Remove String",
    "Replace String",
    "Should Be String",
    "Split String",
    "Split To Lines",
    "Strip String",
    // Screenshot
    "Take Screenshot",
];

/// Used when configuration supplies no custom keyword list.
pub const DEFAULT_CUSTOM: &[&str] = &[
    "Open Application",
    "Close Application",
    "Kill Application",
    "Connect To Application",
    "Get Process ID",
    "Wait For Process Exit",
];

/// Immutable set of keyword names, longest first, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    names: Vec<String>,
}

impl KeywordIndex {
    /// Build from raw names: blanks dropped, case-insensitive duplicates
    /// dropped (first spelling wins), longest first.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
            .collect();
        names.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        });
        KeywordIndex { names }
    }

    /// Index for one run: the library's own keywords, the standard library
    /// and the configured custom keywords (or the defaults when None).
    pub fn for_library(library: &LibraryInfo, custom: Option<&[String]>) -> Self {
        let own = library.keywords.iter().map(|k| k.name.as_str());
        let standard = STANDARD_LIBRARY.iter().copied();
        match custom {
            Some(custom) => Self::new(own.chain(standard).chain(custom.iter().map(String::as_str))),
            None => Self::new(own.chain(standard).chain(DEFAULT_CUSTOM.iter().copied())),
        }
    }

    /// Byte length of the longest keyword at the start of `text` that is
    /// followed by end of text or whitespace.
    pub fn longest_match(&self, text: &str) -> Option<usize> {
        self.names
            .iter()
            .find(|name| {
                let len = name.len();
                text.is_char_boundary(len)
                    && text[..len].eq_ignore_ascii_case(name)
                    && text[len..].chars().next().is_none_or(char::is_whitespace)
            })
            .map(String::len)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
