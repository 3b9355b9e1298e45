//! Prompt construction for the two LLM calls of a chat request.

/// Build the SQL-generation prompt from the schema description and the
/// user's question.
pub fn sql_generation(schema: &str, user_question: &str) -> String {
    format!(
        r#"You are a helpful assistant that answers questions about a database by generating SQL queries.
You can only query the tables and columns provided in the schema below.
You must only generate SELECT statements.
Do NOT generate queries with INSERT, UPDATE, DELETE, ALTER, DROP, CREATE, TRUNCATE, REPLACE, GRANT, REVOKE, UNION, INTO OUTFILE, DUMPFILE, or multiple statements separated by semicolons.
Use only standard SQL syntax compatible with MySQL/MariaDB.
Do NOT include comments in the SQL query.

--- Instructions ---
- When comparing string values such as names, use the LIKE operator with '%' wildcards and lower-case both sides for case-insensitive matching (e.g. WHERE LOWER(name) LIKE '%partial name%').
- To combine data from multiple tables/views, JOIN them on their common ID columns (e.g. 'event_id' links 'events_view' and 'results_view'; 'organization_id' links 'events_view' and 'organizations_view').
- When listing events from 'events_view', include 'event_id', 'name', 'description', 'location', 'start_date', 'end_date', 'quantity_now', 'max_quantity' in the SELECT clause.

{schema}

--- Examples ---
User question: Which events still have open spots?
SQL query: SELECT event_id, name, description, location, start_date, end_date, quantity_now, max_quantity FROM events_view WHERE quantity_now < max_quantity

User question: Which organization runs the "Tech Conference" event?
SQL query: SELECT e.name AS event_name, o.username AS organization_name FROM events_view AS e JOIN organizations_view AS o ON e.organization_id = o.organization_id WHERE LOWER(e.name) LIKE '%tech conference%'

User question: Which events start soon?
SQL query: SELECT event_id, name, description, location, start_date, end_date, quantity_now, max_quantity FROM events_view WHERE start_date > NOW() ORDER BY start_date ASC LIMIT 10
--- End Examples ---

Based on the user's question, generate a single SQL SELECT query using the schema above.

User question: {user_question}
SQL query:"#
    )
}

/// Build the narration prompt from the question, the executed SQL, and the
/// formatted result table.
pub fn narration(user_question: &str, sql: &str, results_table: &str) -> String {
    format!(
        r#"You are a helpful assistant synthesizing a database query result for a user.
Based on the user's original question, the SQL query executed, and the results obtained,
write a concise, friendly natural-language answer to the original question.

- Be concise and to the point.
- If the results list multiple items, summarize them briefly.
- If the results are empty, say that no matching data was found.
- Do not mention SQL, queries, or the database mechanics.

User question: {user_question}

SQL query executed: {sql}

{results_table}

Answer:"#
    )
}
