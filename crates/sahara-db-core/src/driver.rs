/*
 *    Licensed under the Apache License, Version 2.0 (the "License");
 *    you may not use this file except in compliance with the License.
 *    You may obtain a copy of the License at
 *
 *        http://www.apache.org/licenses/LICENSE-2.0
 *
 *    Unless required by applicable law or agreed to in writing, software
 *    distributed under the License is distributed on an "AS IS" BASIS,
 *    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *    See the License for the specific language governing permissions and
 *    limitations under the License.
 */

//! Driver package selection
//!
//! | scheme          | OS family | package                                   |
//! |-----------------|-----------|-------------------------------------------|
//! | `postgresql`    | any       | `python-psycopg2`                         |
//! | `mysql+pymysql` | Debian    | `python-pymysql` as `db_backend_package`  |
//! | `mysql+pymysql` | others    | none                                      |
//! | `mysql`         | any       | none                                      |

use crate::connection::Scheme;
use crate::params::OsFamily;
use serde::{Deserialize, Serialize};

pub const PSYCOPG2_PACKAGE: &str = "python-psycopg2";
pub const PYMYSQL_PACKAGE: &str = "python-pymysql";

/// Resource title of the MySQL driver package
pub const BACKEND_PACKAGE_TITLE: &str = "db_backend_package";

/// A package the host should have in the given state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDeclaration {
    pub title: String,
    pub name: String,
    pub ensure: String,
}

impl PackageDeclaration {
    fn new(title: &str, name: &str, ensure: &str) -> Self {
        Self {
            title: title.to_string(),
            name: name.to_string(),
            ensure: ensure.to_string(),
        }
    }
}

/// Driver package needed for `scheme` on a host of `family`, if any
pub fn driver_package(
    scheme: Scheme,
    family: &OsFamily,
    ensure: &str,
) -> Option<PackageDeclaration> {
    match (scheme, family) {
        (Scheme::Postgresql, _) => Some(PackageDeclaration::new(
            PSYCOPG2_PACKAGE,
            PSYCOPG2_PACKAGE,
            ensure,
        )),
        (Scheme::MysqlPymysql, OsFamily::Debian) => Some(PackageDeclaration::new(
            BACKEND_PACKAGE_TITLE,
            PYMYSQL_PACKAGE,
            ensure,
        )),
        (Scheme::MysqlPymysql, _) => None,
        (Scheme::Mysql, _) => None,
    }
}
