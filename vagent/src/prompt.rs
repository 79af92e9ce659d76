//! System prompt assembly.

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the Query Agent of a store monitoring system. \
Read the provided plan and call the given tools to collect the data it needs.";

const QUERY_GUIDANCE: &str = "## How to work
1. Assess what you already know and what you still need.
2. If the plan is fully covered, answer with \"Done\" as the thought and [] as the function list.
3. Otherwise call only the tools listed above; never invent tools.
4. Provide argument values of the declared kinds.
5. Combine independent calls in one response; call dependent tools across iterations.
6. When a call fails, read the error and correct the call.";

pub(crate) fn system_prompt(base: &str, tool_instructions: &str, today: &str) -> String {
    let mut prompt = base.trim_end().to_string();
    prompt.push_str("\n\n## Tools\n");
    if tool_instructions.trim().is_empty() {
        prompt.push_str("(no tools are available)\n");
    } else {
        prompt.push_str(tool_instructions);
    }
    prompt.push('\n');
    prompt.push_str(QUERY_GUIDANCE);
    prompt.push_str(&format!(
        "\n7. Assume the current time is {today} when the plan gives no date."
    ));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_lists_tools_and_reference_time() {
        let prompt = system_prompt("Base.\n", "- flow_query: sums flow\n", "2024-05-27 23:59:59");
        assert!(prompt.starts_with("Base.\n\n## Tools\n- flow_query: sums flow\n"));
        assert!(prompt.ends_with(
            "Assume the current time is 2024-05-27 23:59:59 when the plan gives no date."
        ));
    }

    #[test]
    fn prompt_marks_empty_toolset() {
        let prompt = system_prompt("Base.", "", "now");
        assert!(prompt.contains("(no tools are available)"));
    }
}
