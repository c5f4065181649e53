// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Full client/server exchange through the public API: protocol declaration,
// typed handlers, signed calls, remote errors.

#![allow(clippy::float_cmp)]

use nanocluster::auth::{CredentialVerifier, StaticCredentialStore, UsernamePasswordAuth};
use nanocluster::rpc::{
    CallContext, HandlerError, HandlerResult, Implementation, LoopbackTransport, Protocol,
    RpcClient, RpcError, RpcServer,
};
use nanocluster::types::typed::{array, function, number, object, string};
use nanocluster::types::{FromValue, TypeError};
use nanocluster::value::Map;
use nanocluster::Value;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Item {
    sku: String,
    qty: f64,
}

impl FromValue for Item {
    fn from_value(mut value: Value) -> Result<Self, TypeError> {
        Ok(Self {
            sku: String::from_value(value.take_field("sku"))?,
            qty: f64::from_value(value.take_field("qty"))?,
        })
    }
}

#[derive(Default)]
struct Inventory {
    stock: Mutex<BTreeMap<String, f64>>,
}

fn item_type() -> nanocluster::Type<Item> {
    object([("sku", string().erase()), ("qty", number().erase())])
}

fn protocol() -> Protocol {
    Protocol::builder()
        .method("restock", function([item_type()]).returns(number()))
        .method("list", function(Vec::<nanocluster::TypeDescriptor>::new()).returns(array(item_type())))
        .build()
        .expect("protocol")
}

fn implementation() -> Implementation<CallContext<Inventory>> {
    Implementation::new()
        .handler("restock", |ctx: CallContext<Inventory>, args: Vec<Value>| async move {
            let mut args = args.into_iter();
            let item = item_type()
                .parse(args.next().unwrap_or_default())
                .map_err(HandlerError::from)?;
            if item.qty < 0.0 {
                return Err(HandlerError::new(format!("negative quantity for {}", item.sku)));
            }
            let mut stock = ctx.state.stock.lock();
            let level = stock.entry(item.sku).or_insert(0.0);
            *level += item.qty;
            let result: HandlerResult = Ok(Value::from(*level));
            result
        })
        .sync_handler("list", |ctx: CallContext<Inventory>, _args: Vec<Value>| {
            let items = ctx
                .state
                .stock
                .lock()
                .iter()
                .map(|(sku, qty)| {
                    let mut entry = Map::new();
                    entry.insert("sku".to_string(), Value::from(sku.as_str()));
                    entry.insert("qty".to_string(), Value::from(*qty));
                    Value::from(entry)
                })
                .collect::<Vec<_>>();
            Ok(Value::from(items))
        })
}

fn item(sku: &str, qty: f64) -> Value {
    Value::object([("sku", Value::from(sku)), ("qty", Value::from(qty))])
}

fn connect() -> RpcClient {
    let verifier =
        CredentialVerifier::new(StaticCredentialStore::new().with_user("clerk", "pa55"));
    let server = RpcServer::new("inventory", protocol(), implementation(), Inventory::default())
        .expect("server")
        .with_verifier(verifier);

    RpcClient::builder(LoopbackTransport::new(Arc::new(server)))
        .protocol(protocol())
        .authorize(UsernamePasswordAuth::new("clerk", "pa55"))
        .build()
}

#[tokio::test]
async fn state_persists_across_calls() {
    let client = connect();

    assert_eq!(client.call("restock", vec![item("bolt", 5.0)]).await, Ok(Value::from(5)));
    assert_eq!(client.call("restock", vec![item("bolt", 2.0)]).await, Ok(Value::from(7)));
    client.call("restock", vec![item("nut", 1.0)]).await.expect("restock nut");

    let listed = client
        .call_parsed("list", vec![], &array(item_type()))
        .await
        .expect("list");
    assert_eq!(
        listed,
        vec![
            Item { sku: "bolt".to_string(), qty: 7.0 },
            Item { sku: "nut".to_string(), qty: 1.0 },
        ]
    );
}

#[tokio::test]
async fn handler_error_is_remote_error() {
    let client = connect();
    let err = client
        .call("restock", vec![item("bolt", -1.0)])
        .await
        .unwrap_err();
    assert_eq!(err, RpcError::Remote("negative quantity for bolt".to_string()));
}

#[tokio::test]
async fn server_rejects_misshapen_arguments() {
    let client = connect();
    let err = client
        .call("restock", vec![Value::object([("sku", Value::from("bolt"))])])
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "[{\"sku\":\"bolt\"}] is not a [{ sku: string, qty: number }]"
    );
}

#[tokio::test]
async fn method_handles_come_from_the_protocol() {
    let client = connect();
    let names: Vec<String> = client.methods().iter().map(|m| m.name().to_string()).collect();
    assert_eq!(names, vec!["list".to_string(), "restock".to_string()]);

    let restock = client.method("restock").expect("declared");
    assert_eq!(restock.signature().map(|f| f.args.len()), Some(1));
    assert_eq!(restock.call(vec![item("gear", 3.0)]).await, Ok(Value::from(3)));
}
