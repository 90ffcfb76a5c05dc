//! `samlp:Status` and its children.

use crate::element::{at_most_one, children_of, exactly_one, require_attr, SamlElement};
use crate::error::{SamlError, SamlResult};
use crate::ns;
use crate::xml::Node;

/// Response outcome: a mandatory top-level status code, an optional
/// human-readable message, and optional detail content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: StatusCode,
    message: Option<String>,
    detail: Option<StatusDetail>,
}

impl Status {
    pub fn new(code: StatusCode) -> Self {
        Status {
            code,
            message: None,
            detail: None,
        }
    }

    /// Shorthand for the common one-level success status.
    pub fn success() -> Self {
        Status::new(StatusCode::new(ns::STATUS_SUCCESS))
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: StatusDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn code(&self) -> &StatusCode {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn detail(&self) -> Option<&StatusDetail> {
        self.detail.as_ref()
    }

    /// Whether the top-level code is the success URN.
    pub fn is_success(&self) -> bool {
        self.code.value() == ns::STATUS_SUCCESS
    }
}

impl SamlElement for Status {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "Status";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let code = exactly_one::<StatusCode>(node)?;
        let message = at_most_one::<StatusMessage>(node)?.map(|m| m.0);
        let detail = at_most_one::<StatusDetail>(node)?;
        let mut status = Status::new(code);
        if let Some(message) = message {
            status = status.with_message(message);
        }
        if let Some(detail) = detail {
            status = status.with_detail(detail);
        }
        Ok(status)
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        self.code.append_to(&mut node)?;
        if let Some(message) = &self.message {
            StatusMessage(message.clone()).append_to(&mut node)?;
        }
        if let Some(detail) = &self.detail {
            detail.append_to(&mut node)?;
        }
        Ok(node)
    }
}

/// `samlp:StatusCode` — a status URN with zero or more nested subordinate
/// codes, in document order. Nesting is recursive but in practice at most
/// two levels deep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCode {
    value: String,
    sub_codes: Vec<StatusCode>,
}

impl StatusCode {
    pub fn new(value: impl Into<String>) -> Self {
        StatusCode {
            value: value.into(),
            sub_codes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sub_code(mut self, sub_code: StatusCode) -> Self {
        self.sub_codes.push(sub_code);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn sub_codes(&self) -> &[StatusCode] {
        &self.sub_codes
    }
}

impl SamlElement for StatusCode {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "StatusCode";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        let value = require_attr(node, "Value")?;
        if value.is_empty() {
            return Err(SamlError::malformed("StatusCode Value must not be empty"));
        }
        let mut code = StatusCode::new(value);
        code.sub_codes = children_of::<StatusCode>(node)?;
        Ok(code)
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.set_attribute("Value", &self.value);
        for sub_code in &self.sub_codes {
            sub_code.append_to(&mut node)?;
        }
        Ok(node)
    }
}

struct StatusMessage(String);

impl SamlElement for StatusMessage {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "StatusMessage";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        Ok(StatusMessage(node.text()))
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        node.append_text(&self.0);
        Ok(node)
    }
}

/// `samlp:StatusDetail` — arbitrary additional content, preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusDetail {
    children: Vec<Node>,
}

impl StatusDetail {
    pub fn new(children: Vec<Node>) -> Self {
        StatusDetail { children }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

impl SamlElement for StatusDetail {
    const NAMESPACE: &'static str = ns::SAMLP;
    const LOCAL_NAME: &'static str = "StatusDetail";

    fn from_node(node: &Node) -> SamlResult<Self> {
        Self::expect_qname(node)?;
        Ok(StatusDetail::new(node.child_elements().cloned().collect()))
    }

    fn build(&self) -> SamlResult<Node> {
        let mut node = Node::new(Self::NAMESPACE, Self::LOCAL_NAME);
        for child in &self.children {
            node.append_element(child.clone());
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_round_trips() {
        let status = Status::success();
        let decoded = Status::from_node(&status.build().unwrap()).unwrap();
        assert!(decoded.is_success());
        assert_eq!(decoded, status);
    }

    #[test]
    fn nested_sub_codes_round_trip_in_order() {
        let status = Status::new(
            StatusCode::new(ns::STATUS_REQUESTER)
                .with_sub_code(StatusCode::new(ns::STATUS_REQUEST_DENIED))
                .with_sub_code(StatusCode::new(ns::STATUS_PARTIAL_LOGOUT)),
        )
        .with_message("denied by policy");
        let decoded = Status::from_node(&status.build().unwrap()).unwrap();
        assert!(!decoded.is_success());
        let values: Vec<_> = decoded
            .code()
            .sub_codes()
            .iter()
            .map(StatusCode::value)
            .collect();
        assert_eq!(values, [ns::STATUS_REQUEST_DENIED, ns::STATUS_PARTIAL_LOGOUT]);
        assert_eq!(decoded.message(), Some("denied by policy"));
    }

    #[test]
    fn missing_status_code_is_a_schema_violation() {
        let node = Node::new(ns::SAMLP, "Status");
        assert!(matches!(
            Status::from_node(&node),
            Err(SamlError::SchemaViolation(_))
        ));
    }

    #[test]
    fn empty_code_value_is_malformed() {
        let mut node = Node::new(ns::SAMLP, "StatusCode");
        node.set_attribute("Value", "");
        assert!(matches!(
            StatusCode::from_node(&node),
            Err(SamlError::MalformedValue(_))
        ));
    }
}
