//! Curated parking-infrastructure data.
//!
//! Nameserver hosts and IP ranges operated by domain parking and resale
//! services. Both lists are embedded; they change rarely enough that a
//! release cadence keeps them current.

/// Nameserver hosts used by parking providers. Matched against NS records
/// both verbatim and via their registrable domain.
pub(crate) const PARKED_NS_HOSTS: &[&str] = &[
    "above.com",
    "afternic.com",
    "alter.com",
    "bodis.com",
    "bookmyname.com",
    "brainydns.com",
    "brandbucket.com",
    "chookdns.com",
    "cnomy.com",
    "commonmx.com",
    "dan.com",
    "day.biz",
    "dingodns.com",
    "directnic.com",
    "dne.com",
    "dnslink.com",
    "dnsnuts.com",
    "dnsowl.com",
    "dnsspark.com",
    "domain-for-sale.at",
    "domain-for-sale.se",
    "domaincntrol.com",
    "domainhasexpired.com",
    "domainist.com",
    "domainmarket.com",
    "domainmx.com",
    "domainorderdns.nl",
    "domainparking.ru",
    "domainprofi.de",
    "domainrecover.com",
    "dsredirection.com",
    "dsredirects.com",
    "eftydns.com",
    "emailverification.info",
    "emu-dns.com",
    "expiereddnsmanager.com",
    "expirationwarning.net",
    "expired.uniregistry-dns.com",
    "fabulous.com",
    "failed-whois-verification.namecheap.com",
    "fastpark.net",
    "freenom.com",
    "gname.net",
    "hastydns.com",
    "hostresolver.com",
    "ibspark.com",
    "kirklanddc.com",
    "koaladns.com",
    "magpiedns.com",
    "malkm.com",
    "markmonitor.com",
    "mijndomein.nl",
    "milesmx.com",
    "mytrafficmanagement.com",
    "name.com",
    "namedynamics.net",
    "nameprovider.net",
    "ndsplitter.com",
    "ns01.cashparking.com",
    "ns02.cashparking.com",
    "ns1.domain-is-4-sale-at-domainmarket.com",
    "ns1.domain.io",
    "ns1.namefind.com",
    "ns1.park.do",
    "ns1.pql.net",
    "ns1.smartname.com",
    "ns1.sonexo.eu",
    "ns1.undeveloped.com",
    "ns2.domain.io",
    "ns2.domainmarket.com",
    "ns2.namefind.com",
    "ns2.park.do",
    "ns2.pql.net",
    "ns2.smartname.com",
    "ns2.sonexo.com",
    "ns2.undeveloped.com",
    "ns3.tppns.com",
    "ns4.tppns.com",
    "nsresolution.com",
    "one.com",
    "onlydomains.com",
    "panamans.com",
    "park1.encirca.net",
    "park2.encirca.net",
    "parkdns1.internetvikings.com",
    "parkdns2.internetvikings.com",
    "parking-page.net",
    "parking.namecheap.com",
    "parking1.ovh.net",
    "parking2.ovh.net",
    "parkingcrew.net",
    "parkingpage.namecheap.com",
    "parkingspa.com",
    "parklogic.com",
    "parktons.com",
    "perfectdomain.com",
    "quokkadns.com",
    "redirectdom.com",
    "redmonddc.com",
    "registrar-servers.com",
    "renewyourname.net",
    "rentondc.com",
    "rookdns.com",
    "rzone.de",
    "sav.com",
    "searchfusion.com",
    "searchreinvented.com",
    "securetrafficrouting.com",
    "sedo.com",
    "sedoparking.com",
    "smtmdns.com",
    "snparking.ru",
    "squadhelp.com",
    "sslparking.com",
    "tacomadc.com",
    "taipandns.com",
    "thednscloud.com",
    "torresdns.com",
    "trafficcontrolrouter.com",
    "trustednam.es",
    "uniregistrymarket.link",
    "verify-contact-details.namecheap.com",
    "voodoo.com",
    "weaponizedcow.com",
    "wombatdns.com",
    "wordpress.com",
    "www.undeveloped.com----type.in",
    "your-browser.this-domain.eu",
    "ztomy.com",
];

/// CIDR ranges of parking landing pages.
pub(crate) const PARKED_IP_RANGES: &[&str] = &[
    "103.120.80.111/32",
    "103.139.0.32/32",
    "103.224.182.0/23",
    "103.224.212.0/23",
    "104.26.6.37/32",
    "104.26.7.37/32",
    "119.28.128.52/32",
    "121.254.178.252/32",
    "13.225.34.0/24",
    "13.227.219.0/24",
    "13.248.216.40/32",
    "135.148.9.101/32",
    "141.8.224.195/32",
    "158.247.7.206/32",
    "158.69.201.47/32",
    "159.89.244.183/32",
    "164.90.244.158/32",
    "172.67.70.191/32",
    "18.164.52.0/24",
    "185.134.245.113/32",
    "185.53.176.0/22",
    "188.93.95.11/32",
    "192.185.0.218/32",
    "192.64.147.0/24",
    "194.58.112.165/32",
    "194.58.112.174/32",
    "198.54.117.192/26",
    "199.191.50.0/24",
    "199.58.179.10/32",
    "199.59.240.0/22",
    "2.57.90.16/32",
    "204.11.56.0/23",
    "207.148.248.143/32",
    "207.148.248.145/32",
    "208.91.196.0/23",
    "208.91.196.46/32",
    "208.91.197.46/32",
    "208.91.197.91/32",
    "209.99.40.222/32",
    "209.99.64.0/24",
    "213.145.228.16/32",
    "213.171.195.105/32",
    "216.40.34.41/32",
    "217.160.141.142/32",
    "217.160.95.94/32",
    "217.26.48.101/32",
    "217.70.184.38/32",
    "217.70.184.50/32",
    "3.139.159.151/32",
    "3.234.55.179/32",
    "3.64.163.50/32",
    "31.186.11.254/32",
    "31.31.205.163/32",
    "34.102.136.180/32",
    "34.102.221.37/32",
    "34.98.99.30/32",
    "35.186.238.101/32",
    "35.227.197.36/32",
    "37.97.254.27/32",
    "43.128.56.249/32",
    "45.79.222.138/32",
    "45.88.202.115/32",
    "46.28.105.2/32",
    "46.30.211.38/32",
    "46.4.13.97/32",
    "46.8.8.100/32",
    "47.91.170.222/32",
    "5.9.161.60/32",
    "50.28.32.8/32",
    "52.128.23.153/32",
    "52.222.139.0/24",
    "52.222.149.0/24",
    "52.222.158.0/24",
    "52.222.174.0/24",
    "52.58.78.16/32",
    "52.60.87.163/32",
    "52.84.174.0/24",
    "62.149.128.40/32",
    "64.190.62.0/23",
    "64.70.19.203/32",
    "64.70.19.98/32",
    "66.81.199.0/24",
    "74.220.199.14/32",
    "74.220.199.15/32",
    "74.220.199.6/32",
    "74.220.199.8/32",
    "74.220.199.9/32",
    "75.2.115.196/32",
    "75.2.18.233/32",
    "75.2.26.18/32",
    "76.223.65.111/32",
    "78.47.145.38/32",
    "81.2.194.128/32",
    "88.198.29.97/32",
    "91.184.0.100/32",
    "91.195.240.0/23",
    "91.195.240.80/28",
    "93.191.168.52/32",
    "94.136.40.51/32",
    "95.217.58.108/32",
    "98.124.204.16/32",
    "99.83.154.118/32",
];
