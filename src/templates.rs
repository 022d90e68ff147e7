//! Starter and example workflow documents

use serde::Serialize;

/// A named example document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Lookup name
    pub name: &'static str,
    /// One-line summary
    pub description: &'static str,
    /// Document text
    pub yaml: &'static str,
}

/// Document a new workflow starts from
pub const INITIAL: Template = Template {
    name: "initial",
    description: "Single assistant answering questions about an earnings report",
    yaml: r#"# Start creating your workflows from the example below.
# Docs: https://docs.superagent.sh/overview/getting-started/super-agent-markup-language

workflows:
  - superagent:
      llm: gpt-4-1106-preview
      name: Earnings assistant
      intro: Hi there! How can I help you?
      prompt: Use the earnings report to answer any questions
      data:
        urls:
          - https://s2.q4cdn.com/299287126/files/doc_financials/2023/q3/AMZN-Q3-2023-Earnings-Release.pdf
        use_for: Answering questions about earning report
"#,
};

/// Browser tool example
pub const BROWSER: Template = Template {
    name: "browser",
    description: "Assistant with real-time internet access through the browser tool",
    yaml: r#"# This workflow can browse the internet in real time.

workflows:
  - superagent:
      name: Browser assistant
      llm: gpt-3.5-turbo-16k-0613
      prompt: Use the browser to answer all questions
      intro: Hi there! How can I help you?
      tools:
        - browser:
            name: browser tool
            use_for: searching the internet
"#,
};

/// External data example
pub const RAG: Template = Template {
    name: "rag",
    description: "Assistant answering questions from an attached CSV file",
    yaml: r#"# This workflow answers from external data.

workflows:
  - superagent:
      name: Titanic assistant
      llm: gpt-3.5-turbo-16k-0613
      prompt: Use the excel file to answer all questions.
      intro: Hi there! How can I help you?
      data:
        urls:
          - https://raw.githubusercontent.com/datasciencedojo/datasets/master/titanic.csv
        use_for: Answering questions about the titanic
"#,
};

/// Multi-step example
pub const MULTI_ASSISTANT: Template = Template {
    name: "multi_assistant",
    description: "Two assistants in sequence: a code writer and a code reviewer",
    yaml: r#"# Each step hands its output to the next one.

workflows:
  - superagent:
      name: Code writer
      llm: gpt-4-1106-preview
      prompt: |-
        You are an expert coder, write code based on the users input.
        Only return the filename and code.
      intro: Hi there! What code do you want me to write?
  - superagent:
      name: Code reviewer
      llm: gpt-4-1106-preview
      prompt: |-
        You are an code reviewer. Review the code and write a
        Github comment.
"#,
};

/// Example documents, excluding [`INITIAL`]
pub static EXAMPLES: &[Template] = &[BROWSER, RAG, MULTI_ASSISTANT];

/// Every template, starting with [`INITIAL`]
pub fn all() -> impl Iterator<Item = &'static Template> {
    std::iter::once(&INITIAL).chain(EXAMPLES.iter())
}

/// Look a template up by name
pub fn template(name: &str) -> Option<&'static Template> {
    all().find(|template| template.name == name)
}
