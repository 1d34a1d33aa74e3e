//! Static description of a list operation

use crate::api::constants;
use crate::api::normalize::RecordLayout;

/// An action and the throttle group it is charged to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRef {
    pub action: String,
    pub group: String,
}

impl OperationRef {
    /// Operation whose throttle group has the same name as the action
    pub fn new(action: impl Into<String>) -> Self {
        let action = action.into();
        Self {
            group: action.clone(),
            action,
        }
    }

    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }
}

/// Operation of a list that answers with a `Count` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountSpec {
    pub operation: OperationRef,
    /// Parameter names (or `Prefix.` prefixes) the call must not carry
    pub excluded: Vec<String>,
    /// Element holding the count
    pub tag: String,
}

impl CountSpec {
    pub fn new<S: AsRef<str>>(operation: OperationRef, excluded: &[S]) -> Self {
        Self {
            operation,
            excluded: excluded.iter().map(|s| s.as_ref().to_string()).collect(),
            tag: constants::params::COUNT.to_string(),
        }
    }
}

/// Everything the controller needs to know about one list resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSpec {
    /// First-page operation
    pub primary: OperationRef,
    /// Token-driven follow-up operation, if the list paginates
    pub continuation: Option<OperationRef>,
    pub count: Option<CountSpec>,
    pub layout: RecordLayout,
    /// Further record lists read from the same result element, by name
    pub companions: Vec<(String, RecordLayout)>,
    /// Parameters that must be set before any call and ride along on continuations
    pub required: Vec<String>,
    /// Path of the API section, appended to the base URL
    pub section_path: String,
    /// Section API version sent with every call
    pub version: String,
}

impl ListSpec {
    pub fn new(action: impl Into<String>, layout: RecordLayout) -> Self {
        Self {
            primary: OperationRef::new(action),
            continuation: None,
            count: None,
            layout,
            companions: Vec::new(),
            required: Vec::new(),
            section_path: String::new(),
            version: String::new(),
        }
    }

    /// Paginate with the conventional `<Action>ByNextToken` operation
    pub fn paginated(mut self) -> Self {
        let action = constants::by_next_token(&self.primary.action);
        let group = constants::by_next_token(&self.primary.group);
        self.continuation = Some(OperationRef::new(action).in_group(group));
        self
    }

    pub fn with_continuation(mut self, operation: OperationRef) -> Self {
        self.continuation = Some(operation);
        self
    }

    pub fn with_count<S: AsRef<str>>(mut self, operation: OperationRef, excluded: &[S]) -> Self {
        self.count = Some(CountSpec::new(operation, excluded));
        self
    }

    /// Also collect the records of `layout` from every page, stored under `name`
    pub fn with_companion(mut self, name: impl Into<String>, layout: RecordLayout) -> Self {
        self.companions.push((name.into(), layout));
        self
    }

    pub fn require(mut self, param: impl Into<String>) -> Self {
        self.required.push(param.into());
        self
    }

    pub fn section(mut self, path: impl Into<String>, version: impl Into<String>) -> Self {
        self.section_path = path.into();
        self.version = version.into();
        self
    }
}
