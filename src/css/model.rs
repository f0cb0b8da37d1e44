//! CSS object model: Declaration, DeclarationBlock, Rule, StyleSheet.

use std::fmt;

use log::warn;

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Lowercased property name.
    pub property: String,
    /// The value re-serialized from its tokens.
    pub value: String,
    /// Index of the template registered for this declaration, when it is a
    /// `display` declaration with a template value.
    pub template: Option<usize>,
}

impl Declaration {
    pub fn new(property: impl AsRef<str>, value: impl Into<String>) -> Self {
        Self {
            property: property.as_ref().to_ascii_lowercase(),
            value: value.into(),
            template: None,
        }
    }

    /// Link this declaration to a registered template (builder).
    pub fn with_template(mut self, index: usize) -> Self {
        self.template = Some(index);
        self
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)
    }
}

/// The declarations of one rule, one per property.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeclarationBlock {
    declarations: Vec<Declaration>,
}

impl DeclarationBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration. A later declaration of the same property replaces
    /// the earlier one's value in place.
    pub fn add(&mut self, declaration: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|d| d.property == declaration.property)
        {
            Some(existing) => {
                warn!(
                    "property '{}' declared twice; '{}' replaces '{}'",
                    declaration.property, declaration.value, existing.value
                );
                existing.value = declaration.value;
                existing.template = declaration.template;
            }
            None => self.declarations.push(declaration),
        }
    }

    pub fn get(&self, property: &str) -> Option<&Declaration> {
        let property = property.to_ascii_lowercase();
        self.declarations.iter().find(|d| d.property == property)
    }

    pub fn value(&self, property: &str) -> Option<&str> {
        self.get(property).map(|d| d.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }
}

impl<'a> IntoIterator for &'a DeclarationBlock {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A selector group and its declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector_text: String,
    pub declarations: DeclarationBlock,
}

impl Rule {
    pub fn new(selector_text: impl Into<String>) -> Self {
        Self {
            selector_text: selector_text.into(),
            declarations: DeclarationBlock::new(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.selector_text)?;
        for declaration in &self.declarations {
            writeln!(f, "  {declaration};")?;
        }
        write!(f, "}}")
    }
}

/// A rule or declaration the parser dropped, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Selector text being parsed when the error occurred, possibly partial.
    pub selector_text: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.selector_text, self.message)
    }
}

/// A parsed style sheet: its rules in source order, plus diagnostics for
/// everything that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleSheet {
    pub rules: Vec<Rule>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for StyleSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}
