//! Amino JSON 交易结构
//!
//! 签名文档、签名交易、消息联合类型和规范化序列化。
//! 规范化字节必须与节点逐字节一致，否则签名校验失败。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::{TxError, TxResult};

/// 节点编码接口要求的 StdTx 包装类型
pub const STD_TX_TYPE: &str = "cosmos-sdk/StdTx";
/// secp256k1 公钥的 amino 类型
pub const SECP256K1_PUBKEY_TYPE: &str = "tendermint/PubKeySecp256k1";

/// 零费用档位的 gas 上限
pub const ZERO_FEE_GAS: &str = "200000";
/// 直接广播档位：5,000,000 最小单位
pub const BROADCAST_FEE_AMOUNT: u64 = 5_000_000;
pub const BROADCAST_FEE_GAS: &str = "90000000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

/// 构造单币种金额列表
pub fn coins(amount: u64, denom: &str) -> Vec<Coin> {
    vec![Coin {
        denom: denom.to_string(),
        amount: amount.to_string(),
    }]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

impl StdFee {
    /// 合约执行和普通签名使用的零费用档位
    pub fn zero(denom: &str) -> Self {
        Self {
            amount: coins(0, denom),
            gas: ZERO_FEE_GAS.to_string(),
        }
    }

    /// 直接广播路径使用的费用档位
    pub fn direct_broadcast(denom: &str) -> Self {
        Self {
            amount: coins(BROADCAST_FEE_AMOUNT, denom),
            gas: BROADCAST_FEE_GAS.to_string(),
        }
    }
}

/// 节点和调用方会把整数写成数字或字符串，两种都接受
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uint64Value {
    Number(u64),
    Text(String),
}

impl Uint64Value {
    pub fn to_u64(&self) -> TxResult<u64> {
        match self {
            Uint64Value::Number(n) => Ok(*n),
            Uint64Value::Text(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| TxError::InvalidInput(format!("not an unsigned integer: {:?}", s))),
        }
    }
}

impl From<u64> for Uint64Value {
    fn from(value: u64) -> Self {
        Uint64Value::Number(value)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 消息联合类型
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 可签名消息（封闭集合）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    #[serde(rename = "wasm/MsgExecuteContract")]
    ExecuteContract(MsgExecuteContract),
    #[serde(rename = "cosmos-sdk/MsgSend")]
    Send(MsgSend),
}

/// 合约执行消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgExecuteContract {
    pub sender: String,
    pub contract: String,
    pub msg: ContractMsg,
    #[serde(default)]
    pub sent_funds: Vec<Coin>,
}

/// 原生代币转账消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsgSend {
    pub from_address: String,
    pub to_address: String,
    pub amount: Vec<Coin>,
}

/// 合约调用负载
///
/// cw20 `transfer` 有明确类型；其他负载原样保留，签名字节不会丢字段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractMsg {
    Cw20(Cw20ExecuteMsg),
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum Cw20ExecuteMsg {
    Transfer { recipient: String, amount: String },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 签名文档与签名交易
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdSignDoc {
    pub account_number: String,
    pub chain_id: String,
    pub fee: StdFee,
    pub memo: String,
    pub msgs: Vec<Msg>,
    pub sequence: String,
}

pub fn make_sign_doc(
    msgs: Vec<Msg>,
    fee: StdFee,
    chain_id: &str,
    memo: &str,
    account_number: u64,
    sequence: u64,
) -> StdSignDoc {
    StdSignDoc {
        account_number: account_number.to_string(),
        chain_id: chain_id.to_string(),
        fee,
        memo: memo.to_string(),
        msgs,
        sequence: sequence.to_string(),
    }
}

/// 签名文档的规范化字节
pub fn serialize_sign_doc(doc: &StdSignDoc) -> TxResult<Vec<u8>> {
    let value = serde_json::to_value(doc)
        .map_err(|e| TxError::Signing(format!("sign doc is not serializable: {}", e)))?;
    Ok(canonical_json(&value).into_bytes())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    pub signature: String,
}

/// 已签名交易
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: Vec<Msg>,
    pub fee: StdFee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

pub fn make_std_tx(signed: StdSignDoc, signature: StdSignature) -> StdTx {
    StdTx {
        msg: signed.msgs,
        fee: signed.fee,
        signatures: vec![signature],
        memo: signed.memo,
    }
}

/// 编码接口使用的包装结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappedStdTx {
    #[serde(rename = "type")]
    pub tx_type: String,
    pub value: StdTx,
}

impl From<StdTx> for WrappedStdTx {
    fn from(value: StdTx) -> Self {
        Self {
            tx_type: STD_TX_TYPE.to_string(),
            value,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 规范化 JSON
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 键按字节序递归排序、无空白、转义 `&<>` 的 JSON
///
/// 不依赖 serde_json 的 Map 实现（preserve_order 特性会改变迭代顺序）。
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        other => out.push_str(&other.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    let quoted = Value::String(s.to_owned()).to_string();
    for ch in quoted.chars() {
        match ch {
            '&' => out.push_str("\\u0026"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn transfer_msg() -> Msg {
        Msg::ExecuteContract(MsgExecuteContract {
            sender: "S1".to_string(),
            contract: "C1".to_string(),
            msg: ContractMsg::Cw20(Cw20ExecuteMsg::Transfer {
                recipient: "R1".to_string(),
                amount: "100".to_string(),
            }),
            sent_funds: vec![],
        })
    }

    #[test]
    fn test_canonical_json_sorts_keys_recursively() {
        let mut inner = serde_json::Map::new();
        inner.insert("zeta".to_string(), json!(1));
        inner.insert("alpha".to_string(), json!([{"b": 2, "a": 1}]));
        let mut outer = serde_json::Map::new();
        outer.insert("y".to_string(), Value::Object(inner));
        outer.insert("x".to_string(), json!("v"));

        assert_eq!(
            canonical_json(&Value::Object(outer)),
            r#"{"x":"v","y":{"alpha":[{"a":1,"b":2}],"zeta":1}}"#
        );
    }

    #[test]
    fn test_canonical_json_escapes_html_characters() {
        let value = json!({"memo": "a<b>&c"});
        assert_eq!(
            canonical_json(&value),
            r#"{"memo":"a\u003cb\u003e\u0026c"}"#
        );
    }

    #[test]
    fn test_sign_doc_serialization() {
        let doc = make_sign_doc(
            vec![transfer_msg()],
            StdFee::zero("umdse"),
            "mdse",
            "test",
            5,
            2,
        );
        let bytes = serialize_sign_doc(&doc).unwrap();
        let expected = concat!(
            r#"{"account_number":"5","chain_id":"mdse","#,
            r#""fee":{"amount":[{"amount":"0","denom":"umdse"}],"gas":"200000"},"#,
            r#""memo":"test","msgs":[{"type":"wasm/MsgExecuteContract","value":{"#,
            r#""contract":"C1","msg":{"transfer":{"amount":"100","recipient":"R1"}},"#,
            r#""sender":"S1","sent_funds":[]}}],"sequence":"2"}"#
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn test_fee_profiles() {
        let zero = StdFee::zero("umdse");
        assert_eq!(zero.amount, coins(0, "umdse"));
        assert_eq!(zero.gas, "200000");

        let broadcast = StdFee::direct_broadcast("umdse");
        assert_eq!(broadcast.amount[0].amount, "5000000");
        assert_eq!(broadcast.gas, "90000000");
    }

    #[test]
    fn test_unknown_contract_payload_is_preserved() {
        let raw = json!({
            "type": "wasm/MsgExecuteContract",
            "value": {
                "sender": "S1",
                "contract": "C1",
                "msg": {"transfer": {"recipient": "R1", "amount": "1", "memo": "x"}},
                "sent_funds": []
            }
        });
        let msg: Msg = serde_json::from_value(raw.clone()).unwrap();
        match &msg {
            Msg::ExecuteContract(m) => assert!(matches!(m.msg, ContractMsg::Raw(_))),
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        let raw = json!({"type": "cosmos-sdk/MsgDelegate", "value": {}});
        assert!(serde_json::from_value::<Msg>(raw).is_err());
    }

    #[test]
    fn test_uint64_value_accepts_numbers_and_strings() {
        let n: Uint64Value = serde_json::from_value(json!(7)).unwrap();
        let s: Uint64Value = serde_json::from_value(json!("7")).unwrap();
        assert_eq!(n.to_u64().unwrap(), 7);
        assert_eq!(s.to_u64().unwrap(), 7);

        let bad = Uint64Value::Text("seven".to_string());
        assert!(matches!(bad.to_u64(), Err(TxError::InvalidInput(_))));
    }

    #[test]
    fn test_wrapped_std_tx_type() {
        let tx = make_std_tx(
            make_sign_doc(vec![], StdFee::zero("umdse"), "mdse", "", 0, 0),
            StdSignature {
                pub_key: PubKey {
                    key_type: SECP256K1_PUBKEY_TYPE.to_string(),
                    value: "AA==".to_string(),
                },
                signature: "AA==".to_string(),
            },
        );
        let wrapped = WrappedStdTx::from(tx);
        let value = serde_json::to_value(&wrapped).unwrap();
        assert_eq!(value["type"], "cosmos-sdk/StdTx");
        assert_eq!(value["value"]["signatures"][0]["pub_key"]["type"], SECP256K1_PUBKEY_TYPE);
    }
}
