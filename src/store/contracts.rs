use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{ContractStore, NetworkRegistry};
use crate::domain::{Contract, ContractId, Network, NetworkId};

/// SQLite-backed contract storage. Network definitions come from config;
/// only their contract lists are persisted.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    networks: BTreeMap<NetworkId, Network>,
}

impl SqliteStore {
    pub fn open(path: &Path, networks: Vec<Network>) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open db {}", path.display()))?;
        Self::with_connection(conn, networks)
    }

    pub fn open_in_memory(networks: Vec<Network>) -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory db")?;
        Self::with_connection(conn, networks)
    }

    fn with_connection(conn: Connection, networks: Vec<Network>) -> Result<Self> {
        let store = Self {
            conn: Mutex::new(conn),
            networks: networks.into_iter().map(|n| (n.id.clone(), n)).collect(),
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<()> {
        self.conn()?.execute_batch(
            "CREATE TABLE IF NOT EXISTS contracts (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                address     TEXT NOT NULL,
                abi         TEXT NOT NULL,
                network_id  TEXT NOT NULL,
                created_at  INTEGER DEFAULT (strftime('%s', 'now'))
            );
            CREATE TABLE IF NOT EXISTS network_contracts (
                network_id  TEXT NOT NULL,
                contract_id TEXT NOT NULL,
                position    INTEGER NOT NULL,
                PRIMARY KEY (network_id, contract_id)
            );",
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("contract store lock poisoned"))
    }

    fn contract_ids_for(&self, conn: &Connection, network_id: &str) -> Result<Vec<ContractId>> {
        let mut stmt = conn.prepare(
            "SELECT contract_id FROM network_contracts WHERE network_id = ?1 ORDER BY position",
        )?;
        let mut rows = stmt.query(params![network_id])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let raw: String = row.get(0)?;
            let id = Uuid::parse_str(&raw).with_context(|| format!("bad contract id {raw}"))?;
            out.push(id);
        }
        Ok(out)
    }

    fn with_contracts(&self, conn: &Connection, network: &Network) -> Result<Network> {
        let mut network = network.clone();
        network.contracts = self.contract_ids_for(conn, &network.id)?;
        Ok(network)
    }
}

impl NetworkRegistry for SqliteStore {
    fn lookup_network(&self, id: &str) -> Result<Option<Network>> {
        let Some(network) = self.networks.get(id) else {
            return Ok(None);
        };
        let conn = self.conn()?;
        Ok(Some(self.with_contracts(&conn, network)?))
    }

    fn networks(&self) -> Result<Vec<Network>> {
        let conn = self.conn()?;
        self.networks
            .values()
            .map(|network| self.with_contracts(&conn, network))
            .collect()
    }

    fn update_network_contracts(&self, id: &str, contracts: &[ContractId]) -> Result<()> {
        if !self.networks.contains_key(id) {
            anyhow::bail!("unknown network {id}");
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM network_contracts WHERE network_id = ?1",
            params![id],
        )?;
        for (position, contract_id) in contracts.iter().enumerate() {
            tx.execute(
                "INSERT OR IGNORE INTO network_contracts(network_id, contract_id, position)
                 VALUES (?1, ?2, ?3)",
                params![id, contract_id.to_string(), position as i64],
            )?;
        }
        tx.commit()?;
        tracing::debug!(network = id, count = contracts.len(), "network contracts updated");
        Ok(())
    }
}

impl ContractStore for SqliteStore {
    fn get_contracts_by_ids(&self, ids: &[ContractId]) -> Result<Vec<Contract>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, address, abi, network_id FROM contracts WHERE id = ?1",
        )?;

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let mut rows = stmt.query(params![id.to_string()])?;
            if let Some(row) = rows.next()? {
                out.push(Contract {
                    id: *id,
                    name: row.get(1)?,
                    address: row.get(2)?,
                    abi: row.get(3)?,
                    network_id: row.get(4)?,
                });
            }
        }
        Ok(out)
    }

    fn create_contract(&self, contract: &Contract) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO contracts(id, name, address, abi, network_id) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                address=excluded.address,
                abi=excluded.abi,
                network_id=excluded.network_id",
            params![
                contract.id.to_string(),
                contract.name,
                contract.address,
                contract.abi,
                contract.network_id
            ],
        )?;
        tracing::debug!(id = %contract.id, name = %contract.name, "contract saved");
        Ok(())
    }

    fn delete_contract(&self, id: ContractId) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM contracts WHERE id = ?1", params![id.to_string()])?;
        tracing::debug!(%id, "contract deleted");
        Ok(())
    }
}
