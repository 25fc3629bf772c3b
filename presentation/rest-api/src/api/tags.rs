use poem_openapi::Tags;

#[derive(Debug, Tags)]
pub enum ApiTags {
    Health,
    /// Connection to the MCP server
    Mcp,
    /// Conversation with the assistant
    Chat,
}
