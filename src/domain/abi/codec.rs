//! Encode form inputs into calldata and decode call results with alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue, FunctionExt, JsonAbiExt, Specifier};
use alloy_json_abi::Function;
use alloy_primitives::U256;
use anyhow::{bail, Context, Result};

/// Decoded input or output value, formatted for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArg {
    pub name: String,
    pub kind: String,
    pub value: String,
}

/// A function picked from the generated form together with the raw text
/// the user entered for each input
#[derive(Debug, Clone, PartialEq)]
pub struct AbiFunctionCall {
    pub function: Function,
    pub args: Vec<String>,
    /// Wei attached to payable calls
    pub value: U256,
}

impl AbiFunctionCall {
    pub fn new(function: Function, args: Vec<String>) -> Self {
        Self {
            function,
            args,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn is_read_only(&self) -> bool {
        super::is_read_only(&self.function)
    }

    /// Selector followed by the ABI-encoded arguments
    pub fn encode(&self) -> Result<Vec<u8>> {
        let inputs = &self.function.inputs;
        if self.args.len() != inputs.len() {
            bail!(
                "Argument count mismatch for {}: expected {} arguments, got {}",
                self.function.name,
                inputs.len(),
                self.args.len()
            );
        }

        let values = inputs
            .iter()
            .zip(&self.args)
            .enumerate()
            .map(|(idx, (param, arg))| {
                let ty: DynSolType = param
                    .resolve()
                    .with_context(|| format!("Failed to resolve type '{}'", param.ty))?;
                ty.coerce_str(arg.trim()).with_context(|| {
                    format!("Failed to parse argument {} (type {})", idx + 1, param.ty)
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.function
            .abi_encode_input(&values)
            .context("Failed to encode calldata")
    }

    /// Decode the bytes returned by a call into named outputs
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<DecodedArg>> {
        let values = self
            .function
            .abi_decode_output(data)
            .with_context(|| format!("Failed to decode output of {}", self.function.name))?;

        Ok(self
            .function
            .outputs
            .iter()
            .zip(values.iter())
            .enumerate()
            .map(|(idx, (param, value))| DecodedArg {
                name: if param.name.trim().is_empty() {
                    format!("output{}", idx)
                } else {
                    param.name.clone()
                },
                kind: param.ty.clone(),
                value: format_dyn_sol_value(value),
            })
            .collect())
    }
}

/// Format a DynSolValue for display
pub(crate) fn format_dyn_sol_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => {
            let s = u.to_string();
            if s.len() > 20 {
                format!("0x{:x}", u)
            } else {
                s
            }
        }
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => format!("{:?}", addr),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => {
            if bytes.len() <= 32 {
                format!("0x{}", hex::encode(bytes))
            } else {
                format!("0x{}… ({} bytes)", hex::encode(&bytes[..32]), bytes.len())
            }
        }
        DynSolValue::String(s) => {
            if s.chars().count() <= 64 {
                format!("\"{}\"", s)
            } else {
                let head: String = s.chars().take(64).collect();
                format!("\"{}…\" ({} chars)", head, s.chars().count())
            }
        }
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let max_items = 10;
            let items: Vec<String> = arr
                .iter()
                .take(max_items)
                .map(format_dyn_sol_value)
                .collect();
            if arr.len() > max_items {
                format!("[{}, …] ({} items)", items.join(", "), arr.len())
            } else {
                format!("[{}]", items.join(", "))
            }
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_dyn_sol_value).collect();
            format!("({})", items.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{parse_abi, ERC20_ABI};

    fn function(name: &str) -> Function {
        let abi = parse_abi(ERC20_ABI).unwrap();
        abi.function(name).unwrap()[0].clone()
    }

    #[test]
    fn test_encode_transfer() {
        let call = AbiFunctionCall::new(
            function("transfer"),
            vec![
                "0x742d35cc6634c0532925a3b844bc9e7595f0beb0".into(),
                "1000000".into(),
            ],
        );

        let calldata = call.encode().unwrap();
        assert!(hex::encode(&calldata).starts_with("a9059cbb"));
        assert_eq!(calldata.len(), 4 + 64);
        assert!(!call.is_read_only());
    }

    #[test]
    fn test_encode_no_args() {
        let call = AbiFunctionCall::new(function("symbol"), Vec::new());
        assert_eq!(call.encode().unwrap().len(), 4);
        assert!(call.is_read_only());
    }

    #[test]
    fn test_argument_count_mismatch() {
        let call = AbiFunctionCall::new(function("transfer"), vec!["0x00".into()]);
        let err = call.encode().unwrap_err();
        assert!(err.to_string().contains("Argument count mismatch"));
    }

    #[test]
    fn test_bad_argument() {
        let call = AbiFunctionCall::new(function("balanceOf"), vec!["not-an-address".into()]);
        assert!(call.encode().is_err());
    }

    #[test]
    fn test_decode_output() {
        let call = AbiFunctionCall::new(function("balanceOf"), Vec::new());
        let mut data = vec![0u8; 32];
        data[31] = 42;

        let outputs = call.decode_output(&data).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].name, "output0");
        assert_eq!(outputs[0].kind, "uint256");
        assert_eq!(outputs[0].value, "42");
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_dyn_sol_value(&DynSolValue::Bool(true)), "true");
        assert_eq!(
            format_dyn_sol_value(&DynSolValue::String("hi".into())),
            "\"hi\""
        );
        let arr = DynSolValue::Array(vec![
            DynSolValue::Uint(U256::from(1u64), 256),
            DynSolValue::Uint(U256::from(2u64), 256),
        ]);
        assert_eq!(format_dyn_sol_value(&arr), "[1, 2]");
    }
}
