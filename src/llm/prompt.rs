//! Instruction template for the context generator.
//!
//! Wraps the collected database information in the prompt-engineering
//! instruction that asks the model to assemble the final agent prompt.

/// Builds the instruction sent to the text-generation service.
///
/// The model's entire response becomes the agent prompt file, so the
/// instruction pins the exact structure and forbids any preamble.
pub fn instruction_for_prompt(database_context: &str) -> String {
    format!(
        r#"
You are an expert MySQL developer and a master prompt engineer. Your goal is to construct a complete and highly effective prompt for converting natural language questions into MySQL queries.
You have been provided with a detailed breakdown of a database below under the "DATABASE INFORMATION" section.

Your task is to generate a complete prompt that includes the following, in this exact order:
1.  An "OVERVIEW" section that you will write.
2.  The full "DATABASE INFORMATION" (Schema, Examples, and Analysis) provided to you.
3.  A section of "IMPORTANT MYSQL NOTES" that you will write.
4.  A section with 7 new, complex, and insightful examples of questions and their corresponding MySQL queries. These examples should demonstrate how to join the provided tables.

CRITICAL INSTRUCTIONS:
- Your entire response will be the final content for the prompt. Start your response *directly* with `## OVERVIEW:`. Do not include any preamble or other text.
- **OVERVIEW:** Write a concise, natural language summary describing what this database appears to be used for, based on the table names and their schemas.
- **IMPORTANT MYSQL NOTES:** Create a bulleted list of key MySQL syntax rules. Include notes on using backticks `` for table/column names, using single quotes for strings, the importance of `JOIN` clauses between the tables, using `LIKE` for partial text matches, and date functions if applicable.
- **EXAMPLES:** The examples must follow the exact format: `**Question:** "..."` followed on a new line by `**SQL Query:** "..."`. The SQL query must be a single line. These examples MUST be complex, using `JOIN`s, `GROUP BY`, `WHERE` clauses, and aggregate functions (`COUNT`, `AVG`, etc.) to answer realistic business questions about the data.

---
{database_context}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_embeds_context() {
        let instruction = instruction_for_prompt("# DATABASE INFORMATION\nTable: `users`");
        assert!(instruction.contains("# DATABASE INFORMATION"));
        assert!(instruction.contains("Table: `users`"));
    }

    #[test]
    fn test_instruction_pins_response_start() {
        let instruction = instruction_for_prompt("");
        assert!(instruction.contains("`## OVERVIEW:`"));
        assert!(instruction.contains("7 new, complex"));
    }
}
