pub mod zabbix;
