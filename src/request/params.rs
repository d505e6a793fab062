//! 声明式参数值与序列化风格

/// 一个参数的取值：缺省、单值或数组
///
/// `Omitted` 的参数在构建时被整体跳过，不会序列化为空串。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ParamValue {
    #[default]
    Omitted,
    Scalar(String),
    Array(Vec<String>),
}

impl ParamValue {
    pub fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from!(&str, String, &String, bool, i32, i64, u16, u32, u64, usize);

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Omitted, Into::into)
    }
}

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        Self::Array(values.iter().map(ToString::to_string).collect())
    }
}

impl<T: ToString> From<&[T]> for ParamValue {
    fn from(values: &[T]) -> Self {
        Self::Array(values.iter().map(ToString::to_string).collect())
    }
}

/// 数组参数的分隔风格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterStyle {
    /// `a,b,c`
    #[default]
    Form,
    /// `a b c`
    SpaceDelimited,
    /// `a|b|c`
    PipeDelimited,
}

impl ParameterStyle {
    const fn delimiter(self) -> &'static str {
        match self {
            Self::Form => ",",
            Self::SpaceDelimited => " ",
            Self::PipeDelimited => "|",
        }
    }
}

/// 参数序列化选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterOptions {
    pub style: ParameterStyle,
    /// 为 true 时数组每个元素重复一次参数名
    pub explode: bool,
}

impl Default for ParameterOptions {
    fn default() -> Self {
        Self {
            style: ParameterStyle::Form,
            explode: true,
        }
    }
}

impl ParameterOptions {
    /// 不展开的数组，按风格拼接为单个值
    pub const fn joined(style: ParameterStyle) -> Self {
        Self {
            style,
            explode: false,
        }
    }

    /// 查询参数：展开时返回多个值，否则按分隔符合并；空数组视同缺省
    pub(crate) fn query_values(&self, value: ParamValue) -> Option<Vec<String>> {
        match value {
            ParamValue::Omitted => None,
            ParamValue::Array(values) if values.is_empty() => None,
            ParamValue::Scalar(value) => Some(vec![value]),
            ParamValue::Array(values) if self.explode => Some(values),
            ParamValue::Array(values) => Some(vec![values.join(self.style.delimiter())]),
        }
    }

    /// 头部值总是合并为一行
    pub(crate) fn header_value(&self, value: ParamValue) -> Option<String> {
        match value {
            ParamValue::Omitted => None,
            ParamValue::Array(values) if values.is_empty() => None,
            ParamValue::Scalar(value) => Some(value),
            ParamValue::Array(values) => Some(values.join(",")),
        }
    }
}
