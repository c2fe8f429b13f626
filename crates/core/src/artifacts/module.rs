//! TypeScript modules and their declarations

/// An `export interface` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDecl {
    pub name: String,
    /// Rendered members, as produced by the declaration compiler
    pub members: Vec<String>,
}

impl InterfaceDecl {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }
}

/// Right-hand side of an `export const`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentExpr {
    /// One row literal
    Object(String),
    /// One literal per row, rendered one per line
    Rows(Vec<String>),
    /// Keyed entries, rendered one per line
    Record(Vec<(String, ContentExpr)>),
}

impl ContentExpr {
    fn render(&self, indent: &str, level: usize, out: &mut String) {
        match self {
            ContentExpr::Object(literal) => out.push_str(literal),
            ContentExpr::Rows(rows) if rows.is_empty() => out.push_str("[]"),
            ContentExpr::Rows(rows) => {
                out.push_str("[\n");
                for row in rows {
                    out.push_str(&indent.repeat(level + 1));
                    out.push_str(row);
                    out.push_str(",\n");
                }
                out.push_str(&indent.repeat(level));
                out.push(']');
            }
            ContentExpr::Record(entries) if entries.is_empty() => out.push_str("{}"),
            ContentExpr::Record(entries) => {
                out.push_str("{\n");
                for (key, value) in entries {
                    out.push_str(&indent.repeat(level + 1));
                    out.push_str(key);
                    out.push_str(": ");
                    value.render(indent, level + 1, out);
                    out.push_str(",\n");
                }
                out.push_str(&indent.repeat(level));
                out.push('}');
            }
        }
    }
}

/// An `export const <name>: <type> = <value>;` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDecl {
    pub name: String,
    /// Interface name, with `[]` for row arrays
    pub type_name: String,
    pub value: ContentExpr,
}

impl ContentDecl {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, value: ContentExpr) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value,
        }
    }
}

/// One emitted TypeScript file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    name: String,
    origins: Vec<String>,
    interfaces: Vec<InterfaceDecl>,
    contents: Vec<ContentDecl>,
    indent: String,
}

impl Module {
    pub(crate) fn new(name: impl Into<String>, indent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origins: Vec::new(),
            interfaces: Vec::new(),
            contents: Vec::new(),
            indent: indent.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name the rendered module is persisted under
    pub fn artifact_name(&self) -> String {
        format!("{}.ts", self.name)
    }

    /// Record a source that contributed to this module
    pub fn add_origin(&mut self, origin: impl Into<String>) {
        let origin = origin.into();
        if !self.origins.contains(&origin) {
            self.origins.push(origin);
        }
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn interfaces(&self) -> &[InterfaceDecl] {
        &self.interfaces
    }

    pub fn contents(&self) -> &[ContentDecl] {
        &self.contents
    }

    pub fn interface(&self, name: &str) -> Option<&InterfaceDecl> {
        self.interfaces.iter().find(|decl| decl.name == name)
    }

    pub fn content(&self, name: &str) -> Option<&ContentDecl> {
        self.contents.iter().find(|decl| decl.name == name)
    }

    /// Add an interface. A name that is already declared keeps its first
    /// declaration, which is returned.
    pub fn declare_interface(&mut self, decl: InterfaceDecl) -> &InterfaceDecl {
        let index = match self.interfaces.iter().position(|d| d.name == decl.name) {
            Some(index) => index,
            None => {
                self.interfaces.push(decl);
                self.interfaces.len() - 1
            }
        };
        &self.interfaces[index]
    }

    /// Add a content declaration; same first-wins rule as interfaces
    pub fn declare_content(&mut self, decl: ContentDecl) -> &ContentDecl {
        let index = match self.contents.iter().position(|d| d.name == decl.name) {
            Some(index) => index,
            None => {
                self.contents.push(decl);
                self.contents.len() - 1
            }
        };
        &self.contents[index]
    }

    /// Render the module text
    pub fn render(&self) -> String {
        let mut blocks = Vec::with_capacity(1 + self.interfaces.len() + self.contents.len());

        if !self.origins.is_empty() {
            blocks.push(format!(
                "// Generated from {}. Do not edit.",
                self.origins.join(", ")
            ));
        }

        for decl in &self.interfaces {
            if decl.members.is_empty() {
                blocks.push(format!("export interface {} {{}}", decl.name));
                continue;
            }
            let mut block = format!("export interface {} {{\n", decl.name);
            for member in &decl.members {
                block.push_str(&self.indent);
                block.push_str(member);
                block.push('\n');
            }
            block.push('}');
            blocks.push(block);
        }

        for decl in &self.contents {
            let mut block = format!("export const {}: {} = ", decl.name, decl.type_name);
            decl.value.render(&self.indent, 0, &mut block);
            block.push(';');
            blocks.push(block);
        }

        let mut text = blocks.join("\n\n");
        text.push('\n');
        text
    }
}
